use crate::entities::{TenantStatus, tenant_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{SubscriptionResponse, UserResponse};

/// Full tenant record, visible to its merchant and to super-admins
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantResponse {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub status: TenantStatus,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub shipping_policy: Option<String>,
    pub return_policy: Option<String>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_ends_at: Option<DateTime<Utc>>,
    pub suspended_reason: Option<String>,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<tenant_entity::Model> for TenantResponse {
    fn from(m: tenant_entity::Model) -> Self {
        Self {
            id: m.id,
            public_id: m.public_id,
            name: m.name,
            subdomain: m.subdomain,
            status: m.status,
            phone: m.phone,
            email: m.email,
            description: m.description,
            logo_url: m.logo_url,
            shipping_policy: m.shipping_policy,
            return_policy: m.return_policy,
            trial_ends_at: m.trial_ends_at,
            subscription_ends_at: m.subscription_ends_at,
            suspended_reason: m.suspended_reason,
            orders_count: m.orders_count,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Public storefront header
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreInfoResponse {
    pub name: String,
    pub subdomain: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// HTML from the merchant's policy editor
    pub shipping_policy: Option<String>,
    pub return_policy: Option<String>,
}

impl From<tenant_entity::Model> for StoreInfoResponse {
    fn from(m: tenant_entity::Model) -> Self {
        Self {
            name: m.name,
            subdomain: m.subdomain,
            description: m.description,
            logo_url: m.logo_url,
            phone: m.phone,
            email: m.email,
            shipping_policy: m.shipping_policy,
            return_policy: m.return_policy,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateStoreSettingsRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub shipping_policy: Option<String>,
    pub return_policy: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<TenantStatus>,
    /// Matches name or subdomain
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuspendTenantRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExtendTrialRequest {
    #[schema(example = 7)]
    pub days: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantDetailResponse {
    pub tenant: TenantResponse,
    pub owner: Option<UserResponse>,
    pub subscription: Option<SubscriptionResponse>,
    pub products_count: i64,
}
