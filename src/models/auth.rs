use crate::entities::{UserRole, user_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TenantResponse;

/// Merchant sign-up: creates the store and its owner account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterMerchantRequest {
    #[schema(example = "Amina Benali")]
    pub full_name: String,
    #[schema(example = "amina@example.dz")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "0661234567")]
    pub phone: Option<String>,
    #[schema(example = "Boutique Amina")]
    pub store_name: String,
    #[schema(example = "amina")]
    pub subdomain: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "amina@example.dz")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub tenant_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            full_name: m.full_name,
            phone: m.phone,
            role: m.role,
            tenant_id: m.tenant_id,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tenant: Option<TenantResponse>,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user: UserResponse,
    pub tenant: Option<TenantResponse>,
}
