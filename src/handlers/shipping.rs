use crate::services::ShippingService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/shipping/wilayas",
    tag = "shipping",
    responses(
        (status = 200, description = "Active wilayas with delivery fees", body = [WilayaResponse])
    )
)]
pub async fn get_wilayas(shipping_service: web::Data<ShippingService>) -> Result<HttpResponse> {
    match shipping_service.list_wilayas(false).await {
        Ok(wilayas) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": wilayas
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shipping/wilayas/{code}/communes",
    tag = "shipping",
    params(
        ("code" = i32, Path, description = "Wilaya code, 1 to 58")
    ),
    responses(
        (status = 200, description = "Communes of the wilaya", body = [CommuneResponse]),
        (status = 404, description = "Wilaya not found")
    )
)]
pub async fn get_communes(
    shipping_service: web::Data<ShippingService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match shipping_service.list_communes(path.into_inner()).await {
        Ok(communes) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": communes
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn shipping_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shipping")
            .route("/wilayas", web::get().to(get_wilayas))
            .route("/wilayas/{code}/communes", web::get().to(get_communes)),
    );
}
