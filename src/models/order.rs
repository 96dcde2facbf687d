use crate::entities::{DeliveryType, OrderStatus, order_entity, order_item_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutItem {
    pub product_id: i64,
    #[schema(example = 1)]
    pub quantity: i32,
}

/// Cash-on-delivery checkout
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    #[schema(example = "Karim Haddad")]
    pub customer_name: String,
    #[schema(example = "0551234567")]
    pub customer_phone: String,
    #[schema(example = 16)]
    pub wilaya_code: i32,
    #[schema(example = "Bab Ezzouar")]
    pub commune: String,
    #[schema(example = "Cité 1200 logements, bloc 4")]
    pub address: String,
    pub delivery_type: DeliveryType,
    pub notes: Option<String>,
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub line_total: i64,
}

impl From<order_item_entity::Model> for OrderItemResponse {
    fn from(m: order_item_entity::Model) -> Self {
        Self {
            product_id: m.product_id,
            product_name: m.product_name,
            unit_price: m.unit_price,
            quantity: m.quantity,
            line_total: m.line_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub wilaya_code: i32,
    pub commune: String,
    pub address: String,
    pub delivery_type: DeliveryType,
    pub notes: Option<String>,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
}

impl OrderResponse {
    pub fn from_parts(order: order_entity::Model, items: Vec<order_item_entity::Model>) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            wilaya_code: order.wilaya_code,
            commune: order.commune,
            address: order.address,
            delivery_type: order.delivery_type,
            notes: order.notes,
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            total: order.total,
            status: order.status,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Row in the merchant's order list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub wilaya_code: i32,
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<order_entity::Model> for OrderSummaryResponse {
    fn from(m: order_entity::Model) -> Self {
        Self {
            id: m.id,
            order_number: m.order_number,
            customer_name: m.customer_name,
            customer_phone: m.customer_phone,
            wilaya_code: m.wilaya_code,
            total: m.total,
            status: m.status,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Public tracking view, without the customer's address
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderTrackingResponse {
    pub order_number: String,
    pub status: OrderStatus,
    pub total: i64,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderTrackingResponse {
    pub fn from_parts(order: order_entity::Model, items: Vec<order_item_entity::Model>) -> Self {
        Self {
            order_number: order.order_number,
            status: order.status,
            total: order.total,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at.unwrap_or_else(Utc::now),
            updated_at: order.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<OrderStatus>,
    /// Matches order number or customer phone
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackOrderQuery {
    pub phone: String,
}
