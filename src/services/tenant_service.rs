use crate::entities::{
    SubscriptionStatus, TenantAccess, TenantStatus, subscription_entity as subscriptions,
    tenant_entity as tenants,
};
use crate::error::{AppError, AppResult};
use crate::models::{TenantResponse, UpdateStoreSettingsRequest};
use crate::utils::{optional_text, require_text, validate_dz_phone, validate_email};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};

/// Turns a tenant's access state into the HTTP-facing error.
pub fn check_access(tenant: &tenants::Model, now: DateTime<Utc>) -> AppResult<()> {
    match tenant.access_at(now) {
        TenantAccess::Open => Ok(()),
        TenantAccess::Suspended => Err(AppError::Forbidden("This store is suspended".to_string())),
        TenantAccess::Expired => Err(AppError::Forbidden(
            "This store's subscription has expired".to_string(),
        )),
    }
}

#[derive(Clone)]
pub struct TenantService {
    pool: DatabaseConnection,
}

impl TenantService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn find_by_subdomain(&self, subdomain: &str) -> AppResult<Option<tenants::Model>> {
        let tenant = tenants::Entity::find()
            .filter(tenants::Column::Subdomain.eq(subdomain.to_ascii_lowercase()))
            .one(&self.pool)
            .await?;
        Ok(tenant)
    }

    /// Subdomain lookup plus status gating (404 unknown, 403 suspended/expired)
    pub async fn resolve_accessible(&self, subdomain: &str) -> AppResult<tenants::Model> {
        let tenant = self
            .find_by_subdomain(subdomain)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store '{subdomain}' not found")))?;
        check_access(&tenant, Utc::now())?;
        Ok(tenant)
    }

    pub async fn get_by_id(&self, tenant_id: i64) -> AppResult<tenants::Model> {
        tenants::Entity::find_by_id(tenant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
    }

    /// Loads the merchant's tenant and refuses writes while it is gated
    pub async fn require_writable(&self, tenant_id: i64) -> AppResult<tenants::Model> {
        let tenant = self.get_by_id(tenant_id).await?;
        check_access(&tenant, Utc::now())?;
        Ok(tenant)
    }

    pub async fn get_store_settings(&self, tenant_id: i64) -> AppResult<TenantResponse> {
        Ok(self.get_by_id(tenant_id).await?.into())
    }

    pub async fn update_store_settings(
        &self,
        tenant_id: i64,
        request: UpdateStoreSettingsRequest,
    ) -> AppResult<TenantResponse> {
        let tenant = self.get_by_id(tenant_id).await?;
        let mut model = tenant.into_active_model();

        if let Some(name) = &request.name {
            model.name = Set(require_text("Store name", name, 2, 120)?);
        }
        if let Some(phone) = &request.phone {
            model.phone = Set(match phone.trim() {
                "" => None,
                p => Some(validate_dz_phone(p)?),
            });
        }
        if let Some(email) = &request.email {
            model.email = Set(match email.trim() {
                "" => None,
                e => Some(validate_email(e)?),
            });
        }
        if request.description.is_some() {
            model.description = Set(optional_text("Description", request.description.as_deref(), 5000)?);
        }
        if request.logo_url.is_some() {
            model.logo_url = Set(optional_text("Logo URL", request.logo_url.as_deref(), 512)?);
        }
        if request.shipping_policy.is_some() {
            model.shipping_policy =
                Set(optional_text("Shipping policy", request.shipping_policy.as_deref(), 20_000)?);
        }
        if request.return_policy.is_some() {
            model.return_policy =
                Set(optional_text("Return policy", request.return_policy.as_deref(), 20_000)?);
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// Marks trials and subscriptions whose end date has passed as expired.
    /// Returns the number of tenants moved to `expired`.
    ///
    /// Lapsed rows are locked and every update repeats the date condition, so
    /// a payment approved while the sweep runs is never overwritten.
    pub async fn expire_lapsed(&self) -> AppResult<u64> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let lapsed = tenants::Entity::find()
            .filter(lapsed_condition(now))
            .lock_exclusive()
            .all(&txn)
            .await?;

        if lapsed.is_empty() {
            return Ok(0);
        }
        let ids: Vec<i64> = lapsed.iter().map(|t| t.id).collect();

        let result = tenants::Entity::update_many()
            .col_expr(tenants::Column::Status, Expr::value(TenantStatus::Expired))
            .col_expr(tenants::Column::UpdatedAt, Expr::value(now))
            .filter(tenants::Column::Id.is_in(ids.clone()))
            .filter(lapsed_condition(now))
            .exec(&txn)
            .await?;

        subscriptions::Entity::update_many()
            .col_expr(
                subscriptions::Column::Status,
                Expr::value(SubscriptionStatus::Expired),
            )
            .col_expr(subscriptions::Column::UpdatedAt, Expr::value(now))
            .filter(subscriptions::Column::TenantId.is_in(ids))
            .filter(
                subscriptions::Column::Status
                    .is_in([SubscriptionStatus::Trialing, SubscriptionStatus::Active]),
            )
            .filter(subscriptions::Column::CurrentPeriodEnd.lte(now))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        for tenant in &lapsed {
            log::info!("Tenant {} ({}) expired", tenant.id, tenant.subdomain);
        }
        Ok(result.rows_affected)
    }
}

/// Trial or active tenants whose paid or trial period ended at or before `now`.
fn lapsed_condition(now: DateTime<Utc>) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(tenants::Column::Status.eq(TenantStatus::Trial))
                .add(tenants::Column::TrialEndsAt.lte(now)),
        )
        .add(
            Condition::all()
                .add(tenants::Column::Status.eq(TenantStatus::Active))
                .add(tenants::Column::SubscriptionEndsAt.lte(now)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{reload_tenant, seed_subscription, seed_tenant, setup_db};
    use chrono::Duration;
    use sea_orm::prelude::Uuid;

    fn tenant(status: TenantStatus) -> tenants::Model {
        tenants::Model {
            id: 3,
            public_id: Uuid::nil(),
            name: "Hanout".into(),
            subdomain: "hanout".into(),
            status,
            phone: None,
            email: None,
            description: None,
            logo_url: None,
            shipping_policy: None,
            return_policy: None,
            trial_ends_at: None,
            subscription_ends_at: None,
            suspended_reason: Some("unpaid".into()),
            orders_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_check_access_maps_to_forbidden() {
        let now = Utc::now();
        let err = check_access(&tenant(TenantStatus::Suspended), now).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg.contains("suspended")));

        let mut trial = tenant(TenantStatus::Trial);
        trial.trial_ends_at = Some(now - Duration::hours(1));
        let err = check_access(&trial, now).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg.contains("expired")));

        trial.trial_ends_at = Some(now + Duration::days(3));
        assert!(check_access(&trial, now).is_ok());
    }

    async fn subscription_status(db: &DatabaseConnection, tenant_id: i64) -> SubscriptionStatus {
        subscriptions::Entity::find()
            .filter(subscriptions::Column::TenantId.eq(tenant_id))
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn test_sweep_expires_only_lapsed_tenants() {
        let db = setup_db().await;
        let now = Utc::now();
        let past = Some(now - Duration::hours(2));
        let future = Some(now + Duration::days(20));

        let lapsed_trial = seed_tenant(&db, "trial-over", TenantStatus::Trial, past, None).await;
        seed_subscription(&db, lapsed_trial.id, SubscriptionStatus::Trialing, past).await;
        let lapsed_paid = seed_tenant(&db, "paid-over", TenantStatus::Active, None, past).await;
        seed_subscription(&db, lapsed_paid.id, SubscriptionStatus::Active, past).await;
        let running = seed_tenant(&db, "running", TenantStatus::Active, past, future).await;
        seed_subscription(&db, running.id, SubscriptionStatus::Active, future).await;
        let suspended = seed_tenant(&db, "blocked", TenantStatus::Suspended, past, past).await;

        let service = TenantService::new(db.clone());
        assert_eq!(service.expire_lapsed().await.unwrap(), 2);

        assert_eq!(reload_tenant(&db, lapsed_trial.id).await.status, TenantStatus::Expired);
        assert_eq!(reload_tenant(&db, lapsed_paid.id).await.status, TenantStatus::Expired);
        assert_eq!(reload_tenant(&db, running.id).await.status, TenantStatus::Active);
        assert_eq!(reload_tenant(&db, suspended.id).await.status, TenantStatus::Suspended);
        assert_eq!(subscription_status(&db, lapsed_trial.id).await, SubscriptionStatus::Expired);
        assert_eq!(subscription_status(&db, lapsed_paid.id).await, SubscriptionStatus::Expired);
        assert_eq!(subscription_status(&db, running.id).await, SubscriptionStatus::Active);

        // nothing left to do on a second pass
        assert_eq!(service.expire_lapsed().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sweep_leaves_renewed_subscription_alone() {
        let db = setup_db().await;
        let now = Utc::now();
        let tenant = seed_tenant(
            &db,
            "renewed",
            TenantStatus::Trial,
            Some(now - Duration::minutes(5)),
            None,
        )
        .await;
        seed_subscription(
            &db,
            tenant.id,
            SubscriptionStatus::Active,
            Some(now + Duration::days(30)),
        )
        .await;
        let cancelled = seed_tenant(
            &db,
            "cancelled",
            TenantStatus::Active,
            None,
            Some(now - Duration::days(1)),
        )
        .await;
        seed_subscription(
            &db,
            cancelled.id,
            SubscriptionStatus::Cancelled,
            Some(now - Duration::days(1)),
        )
        .await;

        TenantService::new(db.clone()).expire_lapsed().await.unwrap();

        assert_eq!(subscription_status(&db, tenant.id).await, SubscriptionStatus::Active);
        assert_eq!(subscription_status(&db, cancelled.id).await, SubscriptionStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_resolve_gates_by_status() {
        let db = setup_db().await;
        let now = Utc::now();
        seed_tenant(&db, "open", TenantStatus::Trial, Some(now + Duration::days(3)), None).await;
        seed_tenant(&db, "shut", TenantStatus::Suspended, None, None).await;

        let service = TenantService::new(db);
        assert!(service.resolve_accessible("OPEN").await.is_ok());
        assert!(matches!(
            service.resolve_accessible("shut").await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.resolve_accessible("nobody").await,
            Err(AppError::NotFound(_))
        ));
    }
}
