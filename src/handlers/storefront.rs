//! Public storefront API.
//!
//! Two addressing modes share the same service calls: `/store/...` serves
//! the tenant resolved from the request host by `TenantMiddleware`, while
//! `/storefront/{subdomain}/...` resolves and gates the tenant from the path.

use crate::middlewares::current_tenant;
use crate::models::*;
use crate::services::StorefrontService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/store",
    tag = "storefront",
    responses(
        (status = 200, description = "Store of the request host", body = StoreInfoResponse),
        (status = 403, description = "Store suspended or expired"),
        (status = 404, description = "No store on this host")
    )
)]
pub async fn get_store(
    storefront_service: web::Data<StorefrontService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    match current_tenant(&req) {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": storefront_service.store_info(&tenant)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/store/products",
    tag = "storefront",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, max 100"),
        ("search" = Option<String>, Query, description = "Case-insensitive name search")
    ),
    responses(
        (status = 200, description = "Active products of the store"),
        (status = 404, description = "No store on this host")
    )
)]
pub async fn get_store_products(
    storefront_service: web::Data<StorefrontService>,
    req: HttpRequest,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(e.error_response()),
    };

    match storefront_service.list_products(&tenant, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/store/products/{id}",
    tag = "storefront",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product", body = PublicProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_store_product(
    storefront_service: web::Data<StorefrontService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(e.error_response()),
    };

    match storefront_service.get_product(&tenant, path.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/storefront/{subdomain}",
    tag = "storefront",
    params(
        ("subdomain" = String, Path, description = "Store subdomain")
    ),
    responses(
        (status = 200, description = "Store info", body = StoreInfoResponse),
        (status = 403, description = "Store suspended or expired"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn get_storefront(
    storefront_service: web::Data<StorefrontService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match storefront_service.resolve(&path).await {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": storefront_service.store_info(&tenant)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/storefront/{subdomain}/products",
    tag = "storefront",
    params(
        ("subdomain" = String, Path, description = "Store subdomain"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, max 100"),
        ("search" = Option<String>, Query, description = "Case-insensitive name search")
    ),
    responses(
        (status = 200, description = "Active products of the store"),
        (status = 403, description = "Store suspended or expired"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn get_storefront_products(
    storefront_service: web::Data<StorefrontService>,
    path: web::Path<String>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    let tenant = match storefront_service.resolve(&path).await {
        Ok(tenant) => tenant,
        Err(e) => return Ok(e.error_response()),
    };

    match storefront_service.list_products(&tenant, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/storefront/{subdomain}/products/{id}",
    tag = "storefront",
    params(
        ("subdomain" = String, Path, description = "Store subdomain"),
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product", body = PublicProductResponse),
        (status = 404, description = "Store or product not found")
    )
)]
pub async fn get_storefront_product(
    storefront_service: web::Data<StorefrontService>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse> {
    let (subdomain, product_id) = path.into_inner();
    let tenant = match storefront_service.resolve(&subdomain).await {
        Ok(tenant) => tenant,
        Err(e) => return Ok(e.error_response()),
    };

    match storefront_service.get_product(&tenant, product_id).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/storefront/{subdomain}/checkout",
    tag = "storefront",
    params(
        ("subdomain" = String, Path, description = "Store subdomain")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed, paid cash on delivery", body = OrderResponse),
        (status = 400, description = "Invalid input or insufficient stock"),
        (status = 403, description = "Store suspended or expired"),
        (status = 404, description = "Unknown store or product")
    )
)]
pub async fn storefront_checkout(
    storefront_service: web::Data<StorefrontService>,
    path: web::Path<String>,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse> {
    let tenant = match storefront_service.resolve(&path).await {
        Ok(tenant) => tenant,
        Err(e) => return Ok(e.error_response()),
    };

    match storefront_service
        .checkout(&tenant, request.into_inner())
        .await
    {
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
    path = "/storefront/{subdomain}/orders/{order_number}",
    tag = "storefront",
    params(
        ("subdomain" = String, Path, description = "Store subdomain"),
        ("order_number" = String, Path, description = "Order number, e.g. ORD-250918-00042"),
        ("phone" = String, Query, description = "Phone number used at checkout")
    ),
    responses(
        (status = 200, description = "Order status", body = OrderTrackingResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn track_order(
    storefront_service: web::Data<StorefrontService>,
    path: web::Path<(String, String)>,
    query: web::Query<TrackOrderQuery>,
) -> Result<HttpResponse> {
    let (subdomain, order_number) = path.into_inner();
    let tenant = match storefront_service.resolve(&subdomain).await {
        Ok(tenant) => tenant,
        Err(e) => return Ok(e.error_response()),
    };

    match storefront_service
        .track_order(&tenant, &order_number, &query.phone)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// Host-addressed storefront, tenant attached by `TenantMiddleware`
pub fn store_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/store")
            .route("", web::get().to(get_store))
            .route("/products", web::get().to(get_store_products))
            .route("/products/{id}", web::get().to(get_store_product)),
    );
}

pub fn storefront_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/storefront/{subdomain}")
            .route("", web::get().to(get_storefront))
            .route("/products", web::get().to(get_storefront_products))
            .route("/products/{id}", web::get().to(get_storefront_product))
            .route("/checkout", web::post().to(storefront_checkout))
            .route("/orders/{order_number}", web::get().to(track_order)),
    );
}
