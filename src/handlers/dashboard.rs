use crate::middlewares::current_user;
use crate::services::DashboardService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/dashboard/stats",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Store totals", body = MerchantStatsResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_stats(
    dashboard_service: web::Data<DashboardService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match dashboard_service.merchant_stats(tenant_id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("/stats", web::get().to(get_stats)));
}
