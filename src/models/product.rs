use crate::entities::product_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Robe kabyle")]
    pub name: String,
    pub description: Option<String>,
    /// DZD
    #[schema(example = 4500)]
    pub price: i64,
    #[schema(example = 5200)]
    pub compare_at_price: Option<i64>,
    #[schema(example = 12)]
    pub stock: i32,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub compare_at_price: Option<i64>,
    /// Removes the compare-at price; cannot be combined with `compare_at_price`.
    #[serde(default)]
    pub clear_compare_at_price: bool,
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub active: Option<bool>,
}

/// Merchant view of a product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub compare_at_price: Option<i64>,
    pub stock: i32,
    pub images: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_entity::Model> for ProductResponse {
    fn from(m: product_entity::Model) -> Self {
        let images = m.image_urls();
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            compare_at_price: m.compare_at_price,
            stock: m.stock,
            images,
            is_active: m.is_active,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Storefront view of a product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub compare_at_price: Option<i64>,
    pub in_stock: bool,
    pub stock: i32,
    pub images: Vec<String>,
}

impl From<product_entity::Model> for PublicProductResponse {
    fn from(m: product_entity::Model) -> Self {
        let images = m.image_urls();
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            compare_at_price: m.compare_at_price,
            in_stock: m.stock > 0,
            stock: m.stock,
            images,
        }
    }
}
