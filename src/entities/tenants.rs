use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    #[sea_orm(string_value = "trial")]
    Trial,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "expired")]
    Expired,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl std::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenantStatus::Trial => write!(f, "trial"),
            TenantStatus::Active => write!(f, "active"),
            TenantStatus::Expired => write!(f, "expired"),
            TenantStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// Outcome of gating a tenant at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantAccess {
    Open,
    Suspended,
    Expired,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
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
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Status gating: the stored status alone is not trusted for expiry,
    /// the end dates are checked too so access closes before the sweep runs.
    pub fn access_at(&self, now: DateTime<Utc>) -> TenantAccess {
        match self.status {
            TenantStatus::Suspended => TenantAccess::Suspended,
            TenantStatus::Expired => TenantAccess::Expired,
            TenantStatus::Trial => match self.trial_ends_at {
                Some(ends) if ends <= now => TenantAccess::Expired,
                _ => TenantAccess::Open,
            },
            TenantStatus::Active => match self.subscription_ends_at {
                Some(ends) if ends <= now => TenantAccess::Expired,
                _ => TenantAccess::Open,
            },
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tenant(status: TenantStatus) -> Model {
        Model {
            id: 1,
            public_id: Uuid::nil(),
            name: "Boutique Amina".into(),
            subdomain: "amina".into(),
            status,
            phone: None,
            email: None,
            description: None,
            logo_url: None,
            shipping_policy: None,
            return_policy: None,
            trial_ends_at: None,
            subscription_ends_at: None,
            suspended_reason: None,
            orders_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_suspended_is_always_closed() {
        let mut t = tenant(TenantStatus::Suspended);
        t.subscription_ends_at = Some(Utc::now() + Duration::days(30));
        assert_eq!(t.access_at(Utc::now()), TenantAccess::Suspended);
    }

    #[test]
    fn test_trial_expires_by_date() {
        let now = Utc::now();
        let mut t = tenant(TenantStatus::Trial);
        t.trial_ends_at = Some(now + Duration::days(1));
        assert_eq!(t.access_at(now), TenantAccess::Open);

        t.trial_ends_at = Some(now - Duration::minutes(1));
        assert_eq!(t.access_at(now), TenantAccess::Expired);
    }

    #[test]
    fn test_active_subscription_window() {
        let now = Utc::now();
        let mut t = tenant(TenantStatus::Active);
        t.subscription_ends_at = Some(now + Duration::days(10));
        assert_eq!(t.access_at(now), TenantAccess::Open);

        t.subscription_ends_at = Some(now - Duration::days(1));
        assert_eq!(t.access_at(now), TenantAccess::Expired);
    }

    #[test]
    fn test_expired_status_is_closed() {
        assert_eq!(
            tenant(TenantStatus::Expired).access_at(Utc::now()),
            TenantAccess::Expired
        );
    }
}
