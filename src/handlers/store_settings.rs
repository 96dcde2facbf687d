use crate::middlewares::current_user;
use crate::models::*;
use crate::services::TenantService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/store-settings",
    tag = "store",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Store settings", body = TenantResponse),
        (status = 403, description = "Not a merchant account")
    )
)]
pub async fn get_store_settings(
    tenant_service: web::Data<TenantService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match tenant_service.get_store_settings(tenant_id).await {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": tenant
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/store-settings",
    tag = "store",
    request_body = UpdateStoreSettingsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Store settings updated", body = TenantResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Store suspended or expired")
    )
)]
pub async fn update_store_settings(
    tenant_service: web::Data<TenantService>,
    req: HttpRequest,
    request: web::Json<UpdateStoreSettingsRequest>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = tenant_service.require_writable(tenant_id).await {
        return Ok(e.error_response());
    }

    match tenant_service
        .update_store_settings(tenant_id, request.into_inner())
        .await
    {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": tenant,
            "message": "Store settings saved"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn store_settings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/store-settings")
            .route(web::get().to(get_store_settings))
            .route(web::put().to(update_store_settings)),
    );
}
