use crate::entities::{product_entity as products, tenant_entity as tenants};
use crate::error::{AppError, AppResult};
use crate::models::{
    CheckoutRequest, OrderResponse, OrderTrackingResponse, PaginatedResponse, PaginationParams,
    ProductQuery, PublicProductResponse, StoreInfoResponse,
};
use crate::services::product_service::filter_name;
use crate::services::{OrderService, TenantService};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Public catalog of a single store. Callers pass a tenant that already
/// went through status gating, either from the host middleware or `resolve`.
#[derive(Clone)]
pub struct StorefrontService {
    pool: DatabaseConnection,
    tenant_service: TenantService,
    order_service: OrderService,
}

impl StorefrontService {
    pub fn new(
        pool: DatabaseConnection,
        tenant_service: TenantService,
        order_service: OrderService,
    ) -> Self {
        Self {
            pool,
            tenant_service,
            order_service,
        }
    }

    /// Path-based addressing: same lookup and gate as the host middleware.
    pub async fn resolve(&self, subdomain: &str) -> AppResult<tenants::Model> {
        self.tenant_service.resolve_accessible(subdomain).await
    }

    pub fn store_info(&self, tenant: &tenants::Model) -> StoreInfoResponse {
        tenant.clone().into()
    }

    pub async fn list_products(
        &self,
        tenant: &tenants::Model,
        query: &ProductQuery,
    ) -> AppResult<PaginatedResponse<PublicProductResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let select = products::Entity::find()
            .filter(products::Column::TenantId.eq(tenant.id))
            .filter(products::Column::IsActive.eq(true));
        let select = filter_name(select, query.search.as_deref());

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_product(
        &self,
        tenant: &tenants::Model,
        product_id: i64,
    ) -> AppResult<PublicProductResponse> {
        products::Entity::find_by_id(product_id)
            .filter(products::Column::TenantId.eq(tenant.id))
            .filter(products::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn checkout(
        &self,
        tenant: &tenants::Model,
        request: CheckoutRequest,
    ) -> AppResult<OrderResponse> {
        self.order_service.checkout(tenant, request).await
    }

    pub async fn track_order(
        &self,
        tenant: &tenants::Model,
        order_number: &str,
        phone: &str,
    ) -> AppResult<OrderTrackingResponse> {
        self.order_service.track(tenant.id, order_number, phone).await
    }
}
