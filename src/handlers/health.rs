use actix_web::{HttpResponse, Result, web};
use sea_orm::DatabaseConnection;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and database reachable"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn health(pool: web::Data<DatabaseConnection>) -> Result<HttpResponse> {
    match pool.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "status": "ok", "database": "up" }
        }))),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            Ok(HttpResponse::ServiceUnavailable().json(json!({
                "success": false,
                "error": {
                    "code": "SERVICE_UNAVAILABLE",
                    "message": "Database unavailable"
                }
            })))
        }
    }
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
