use crate::middlewares::{current_tenant, current_user};
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/orders/checkout",
    tag = "storefront",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed, paid cash on delivery", body = OrderResponse),
        (status = 400, description = "Invalid input or insufficient stock"),
        (status = 403, description = "Store suspended or expired"),
        (status = 404, description = "Unknown store or product")
    )
)]
pub async fn checkout(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.checkout(&tenant, request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": order,
            "message": "Order placed"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, max 100"),
        ("status" = Option<OrderStatus>, Query, description = "Filter by status"),
        ("search" = Option<String>, Query, description = "Order number or customer phone")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paginated orders"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.list(tenant_id, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(
        ("id" = i64, Path, description = "Order id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order with items", body = OrderResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.get(tenant_id, path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    tag = "order",
    params(
        ("id" = i64, Path, description = "Order id")
    ),
    request_body = UpdateOrderStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service
        .update_status(tenant_id, path.into_inner(), request.status)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("/checkout", web::post().to(checkout))
            .route("", web::get().to(get_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}/status", web::put().to(update_order_status)),
    );
}
