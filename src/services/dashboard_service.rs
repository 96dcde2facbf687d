use crate::entities::{OrderStatus, order_entity as orders, product_entity as products};
use crate::error::AppResult;
use crate::models::MerchantStatsResponse;
use crate::services::product_service::LOW_STOCK_THRESHOLD;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

#[derive(Clone)]
pub struct DashboardService {
    pool: DatabaseConnection,
}

impl DashboardService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn merchant_stats(&self, tenant_id: i64) -> AppResult<MerchantStatsResponse> {
        let tenant_orders = orders::Entity::find().filter(orders::Column::TenantId.eq(tenant_id));

        let total_orders = tenant_orders.clone().count(&self.pool).await?;
        let pending_orders = tenant_orders
            .clone()
            .filter(orders::Column::Status.eq(OrderStatus::Pending))
            .count(&self.pool)
            .await?;

        let delivered_revenue: Option<i64> = tenant_orders
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(total), 0)::BIGINT"), "revenue")
            .filter(orders::Column::Status.eq(OrderStatus::Delivered))
            .into_tuple()
            .one(&self.pool)
            .await?;

        let tenant_products =
            products::Entity::find().filter(products::Column::TenantId.eq(tenant_id));
        let total_products = tenant_products.clone().count(&self.pool).await?;
        let low_stock_products = tenant_products
            .filter(products::Column::IsActive.eq(true))
            .filter(products::Column::Stock.lte(LOW_STOCK_THRESHOLD))
            .count(&self.pool)
            .await?;

        Ok(MerchantStatsResponse {
            total_orders: total_orders as i64,
            pending_orders: pending_orders as i64,
            delivered_revenue: delivered_revenue.unwrap_or(0),
            total_products: total_products as i64,
            low_stock_products: low_stock_products as i64,
        })
    }
}
