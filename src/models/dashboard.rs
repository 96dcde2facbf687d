use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MerchantStatsResponse {
    pub total_orders: i64,
    pub pending_orders: i64,
    /// Sum of delivered order totals, DZD
    pub delivered_revenue: i64,
    pub total_products: i64,
    pub low_stock_products: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlatformStatsResponse {
    pub total_tenants: i64,
    pub trial_tenants: i64,
    pub active_tenants: i64,
    pub expired_tenants: i64,
    pub suspended_tenants: i64,
    pub pending_payments: i64,
    /// Sum of approved payments, DZD
    pub approved_revenue: i64,
    pub total_orders: i64,
}
