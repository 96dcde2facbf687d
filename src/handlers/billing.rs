use crate::middlewares::current_user;
use crate::models::*;
use crate::services::BillingService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/billing/subscription",
    tag = "billing",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Subscription, plan prices and pending payment", body = BillingOverviewResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_subscription(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match billing_service.overview(tenant_id).await {
        Ok(overview) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": overview
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/billing/payments",
    tag = "billing",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, max 100"),
        ("status" = Option<PaymentStatus>, Query, description = "Filter by status")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paginated payments of the store"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_payments(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match billing_service.list_payments(Some(tenant_id), &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/billing/payments",
    tag = "billing",
    request_body = SubmitPaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Payment submitted for review", body = PaymentResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "A payment is already awaiting review")
    )
)]
pub async fn submit_payment(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
    request: web::Json<SubmitPaymentRequest>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match billing_service
        .submit_payment(tenant_id, request.into_inner())
        .await
    {
        Ok(payment) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": payment,
            "message": "Payment submitted, it will be reviewed shortly"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn billing_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/billing")
            .route("/subscription", web::get().to(get_subscription))
            .route("/payments", web::get().to(get_payments))
            .route("/payments", web::post().to(submit_payment)),
    );
}
