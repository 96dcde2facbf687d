use crate::middlewares::current_user;
use crate::models::*;
use crate::services::ProductService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/products",
    tag = "product",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, max 100"),
        ("search" = Option<String>, Query, description = "Case-insensitive name search"),
        ("active" = Option<bool>, Query, description = "Filter by active flag")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paginated products"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_products(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match product_service.list(tenant_id, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "product",
    request_body = CreateProductRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Store suspended or expired")
    )
)]
pub async fn create_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match product_service.create(tenant_id, request.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "product",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match product_service.get(tenant_id, path.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "product",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    request_body = UpdateProductRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match product_service
        .update(tenant_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "product",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Product deleted, or deactivated when it has orders"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let tenant_id = match current_user(&req).and_then(|u| u.merchant_tenant_id()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match product_service.delete(tenant_id, path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "deleted": true },
            "message": "Product deleted"
        }))),
        Ok(false) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "deleted": false },
            "message": "Product has orders and was deactivated instead"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
