use crate::error::AppResult;
use crate::middlewares::{AuthUser, current_user};
use crate::models::*;
use crate::services::{AdminService, BillingService, ShippingService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn super_admin(req: &HttpRequest) -> AppResult<AuthUser> {
    let user = current_user(req)?;
    user.require_super_admin()?;
    Ok(user)
}

#[utoipa::path(
    get,
    path = "/admin/tenants",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, max 100"),
        ("status" = Option<TenantStatus>, Query, description = "Filter by status"),
        ("search" = Option<String>, Query, description = "Store name or subdomain")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paginated stores"),
        (status = 403, description = "Super-admin only")
    )
)]
pub async fn list_tenants(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    query: web::Query<TenantQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match admin_service.list_tenants(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/tenants/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Tenant id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Store with owner and subscription", body = TenantDetailResponse),
        (status = 404, description = "Store not found")
    )
)]
pub async fn get_tenant(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match admin_service.tenant_detail(path.into_inner()).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/tenants/{id}/suspend",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Tenant id")
    ),
    request_body = SuspendTenantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Store suspended", body = TenantResponse),
        (status = 409, description = "Already suspended")
    )
)]
pub async fn suspend_tenant(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<SuspendTenantRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match admin_service
        .suspend_tenant(path.into_inner(), &request.reason)
        .await
    {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": tenant,
            "message": "Store suspended"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/tenants/{id}/activate",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Tenant id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Suspension lifted", body = TenantResponse),
        (status = 409, description = "Store is not suspended")
    )
)]
pub async fn activate_tenant(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match admin_service.activate_tenant(path.into_inner()).await {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": tenant,
            "message": "Store reactivated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/tenants/{id}/extend-trial",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Tenant id")
    ),
    request_body = ExtendTrialRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Trial extended", body = TenantResponse),
        (status = 400, description = "Invalid days or store already paid")
    )
)]
pub async fn extend_trial(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ExtendTrialRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match admin_service
        .extend_trial(path.into_inner(), request.days)
        .await
    {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": tenant
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/payments",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, max 100"),
        ("status" = Option<PaymentStatus>, Query, description = "Filter by status, e.g. pending")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paginated payments across stores"),
        (status = 403, description = "Super-admin only")
    )
)]
pub async fn list_payments(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match billing_service.list_payments(None, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/payments/{id}/approve",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Payment id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Payment approved, subscription extended", body = PaymentResponse),
        (status = 409, description = "Payment already reviewed")
    )
)]
pub async fn approve_payment(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let admin = match super_admin(&req) {
        Ok(admin) => admin,
        Err(e) => return Ok(e.error_response()),
    };

    match billing_service
        .approve_payment(path.into_inner(), admin.user_id)
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payment,
            "message": "Payment approved"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/payments/{id}/reject",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Payment id")
    ),
    request_body = RejectPaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Payment rejected", body = PaymentResponse),
        (status = 409, description = "Payment already reviewed")
    )
)]
pub async fn reject_payment(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<RejectPaymentRequest>,
) -> Result<HttpResponse> {
    let admin = match super_admin(&req) {
        Ok(admin) => admin,
        Err(e) => return Ok(e.error_response()),
    };

    match billing_service
        .reject_payment(path.into_inner(), admin.user_id, &request.reason)
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payment,
            "message": "Payment rejected"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Platform totals", body = PlatformStatsResponse),
        (status = 403, description = "Super-admin only")
    )
)]
pub async fn get_stats(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match admin_service.platform_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/wilayas",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All wilayas, including inactive ones", body = [WilayaResponse])
    )
)]
pub async fn list_wilayas(
    shipping_service: web::Data<ShippingService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match shipping_service.list_wilayas(true).await {
        Ok(wilayas) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": wilayas
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/wilayas/{code}",
    tag = "admin",
    params(
        ("code" = i32, Path, description = "Wilaya code")
    ),
    request_body = UpdateWilayaRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Wilaya updated", body = WilayaResponse),
        (status = 404, description = "Wilaya not found")
    )
)]
pub async fn update_wilaya(
    shipping_service: web::Data<ShippingService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdateWilayaRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match shipping_service
        .update_wilaya(path.into_inner(), request.into_inner())
        .await
    {
        Ok(wilaya) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": wilaya
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/wilayas/{code}/communes",
    tag = "admin",
    params(
        ("code" = i32, Path, description = "Wilaya code")
    ),
    request_body = AddCommunesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Communes of the wilaya after the insert", body = [CommuneResponse]),
        (status = 404, description = "Wilaya not found")
    )
)]
pub async fn add_communes(
    shipping_service: web::Data<ShippingService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<AddCommunesRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = super_admin(&req) {
        return Ok(e.error_response());
    }

    match shipping_service
        .add_communes(path.into_inner(), request.into_inner())
        .await
    {
        Ok(communes) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": communes
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/tenants", web::get().to(list_tenants))
            .route("/tenants/{id}", web::get().to(get_tenant))
            .route("/tenants/{id}/suspend", web::post().to(suspend_tenant))
            .route("/tenants/{id}/activate", web::post().to(activate_tenant))
            .route("/tenants/{id}/extend-trial", web::post().to(extend_trial))
            .route("/payments", web::get().to(list_payments))
            .route("/payments/{id}/approve", web::post().to(approve_payment))
            .route("/payments/{id}/reject", web::post().to(reject_payment))
            .route("/stats", web::get().to(get_stats))
            .route("/wilayas", web::get().to(list_wilayas))
            .route("/wilayas/{code}", web::put().to(update_wilaya))
            .route("/wilayas/{code}/communes", web::post().to(add_communes)),
    );
}
