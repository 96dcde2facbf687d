use crate::entities::{
    PaymentStatus, SubscriptionStatus, TenantStatus, UserRole,
    order_entity as orders, payment_entity as payments, product_entity as products,
    subscription_entity as subscriptions, tenant_entity as tenants, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    PaginatedResponse, PaginationParams, PlatformStatsResponse, TenantDetailResponse, TenantQuery,
    TenantResponse,
};
use crate::utils::require_text;
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

pub const MAX_TRIAL_EXTENSION_DAYS: i64 = 90;

/// Status a tenant returns to when a suspension is lifted, from its dates.
pub fn status_after_reactivation(tenant: &tenants::Model, now: DateTime<Utc>) -> TenantStatus {
    if tenant.subscription_ends_at.is_some_and(|end| end > now) {
        TenantStatus::Active
    } else if tenant.trial_ends_at.is_some_and(|end| end > now) {
        TenantStatus::Trial
    } else {
        TenantStatus::Expired
    }
}

#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
}

impl AdminService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_tenants(
        &self,
        query: &TenantQuery,
    ) -> AppResult<PaginatedResponse<TenantResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = tenants::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(tenants::Column::Status.eq(status));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(tenants::Column::Name))).like(pattern.clone()))
                    .add(tenants::Column::Subdomain.like(pattern)),
            );
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(tenants::Column::CreatedAt)
            .order_by_desc(tenants::Column::Id)
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

    pub async fn tenant_detail(&self, tenant_id: i64) -> AppResult<TenantDetailResponse> {
        let tenant = self.find_tenant(tenant_id).await?;

        let owner = users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Role.eq(UserRole::Merchant))
            .order_by_asc(users::Column::Id)
            .one(&self.pool)
            .await?;
        let subscription = subscriptions::Entity::find()
            .filter(subscriptions::Column::TenantId.eq(tenant_id))
            .one(&self.pool)
            .await?;
        let products_count = products::Entity::find()
            .filter(products::Column::TenantId.eq(tenant_id))
            .count(&self.pool)
            .await?;

        Ok(TenantDetailResponse {
            tenant: tenant.into(),
            owner: owner.map(Into::into),
            subscription: subscription.map(Into::into),
            products_count: products_count as i64,
        })
    }

    pub async fn suspend_tenant(&self, tenant_id: i64, reason: &str) -> AppResult<TenantResponse> {
        let reason = require_text("Reason", reason, 3, 500)?;
        let tenant = self.find_tenant(tenant_id).await?;
        if tenant.status == TenantStatus::Suspended {
            return Err(AppError::Conflict("Store is already suspended".to_string()));
        }

        let mut model = tenant.into_active_model();
        model.status = Set(TenantStatus::Suspended);
        model.suspended_reason = Set(Some(reason.clone()));
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        log::warn!("Tenant {} suspended: {}", tenant_id, reason);
        Ok(updated.into())
    }

    pub async fn activate_tenant(&self, tenant_id: i64) -> AppResult<TenantResponse> {
        let tenant = self.find_tenant(tenant_id).await?;
        if tenant.status != TenantStatus::Suspended {
            return Err(AppError::Conflict("Store is not suspended".to_string()));
        }

        let now = Utc::now();
        let status = status_after_reactivation(&tenant, now);
        let mut model = tenant.into_active_model();
        model.status = Set(status);
        model.suspended_reason = Set(None);
        model.updated_at = Set(Some(now));
        let updated = model.update(&self.pool).await?;

        log::info!("Tenant {} reactivated as {}", tenant_id, status);
        Ok(updated.into())
    }

    /// Pushes the trial end `days` past `max(now, trial_ends_at)`.
    /// Stores with a paid subscription are refused.
    pub async fn extend_trial(&self, tenant_id: i64, days: i64) -> AppResult<TenantResponse> {
        if !(1..=MAX_TRIAL_EXTENSION_DAYS).contains(&days) {
            return Err(AppError::ValidationError(format!(
                "Days must be between 1 and {MAX_TRIAL_EXTENSION_DAYS}"
            )));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let tenant = tenants::Entity::find_by_id(tenant_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;
        if tenant.status == TenantStatus::Active {
            return Err(AppError::ValidationError(
                "Store already has a paid subscription".to_string(),
            ));
        }

        let base = match tenant.trial_ends_at {
            Some(end) if end > now => end,
            _ => now,
        };
        let trial_ends_at = base + Duration::days(days);

        let previous = tenant.status;
        let mut model = tenant.into_active_model();
        model.trial_ends_at = Set(Some(trial_ends_at));
        if previous == TenantStatus::Expired {
            model.status = Set(TenantStatus::Trial);
        }
        model.updated_at = Set(Some(now));
        let updated = model.update(&txn).await?;

        if let Some(sub) = subscriptions::Entity::find()
            .filter(subscriptions::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            && sub.status != SubscriptionStatus::Active
        {
            let mut sub_model = sub.into_active_model();
            sub_model.status = Set(SubscriptionStatus::Trialing);
            sub_model.current_period_end = Set(Some(trial_ends_at));
            sub_model.updated_at = Set(Some(now));
            sub_model.update(&txn).await?;
        }

        txn.commit().await?;

        log::info!(
            "Tenant {} trial extended by {} days to {}",
            tenant_id,
            days,
            trial_ends_at
        );
        Ok(updated.into())
    }

    pub async fn platform_stats(&self) -> AppResult<PlatformStatsResponse> {
        let by_status: Vec<(TenantStatus, i64)> = tenants::Entity::find()
            .select_only()
            .column(tenants::Column::Status)
            .column_as(Expr::cust("COUNT(*)"), "count")
            .group_by(tenants::Column::Status)
            .into_tuple()
            .all(&self.pool)
            .await?;
        let count_of = |status: TenantStatus| {
            by_status
                .iter()
                .find(|(s, _)| *s == status)
                .map(|(_, n)| *n)
                .unwrap_or(0)
        };

        let pending_payments = payments::Entity::find()
            .filter(payments::Column::Status.eq(PaymentStatus::Pending))
            .count(&self.pool)
            .await?;

        let approved_revenue: Option<i64> = payments::Entity::find()
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(amount), 0)::BIGINT"), "revenue")
            .filter(payments::Column::Status.eq(PaymentStatus::Approved))
            .into_tuple()
            .one(&self.pool)
            .await?;

        let total_orders = orders::Entity::find().count(&self.pool).await?;

        Ok(PlatformStatsResponse {
            total_tenants: by_status.iter().map(|(_, n)| n).sum(),
            trial_tenants: count_of(TenantStatus::Trial),
            active_tenants: count_of(TenantStatus::Active),
            expired_tenants: count_of(TenantStatus::Expired),
            suspended_tenants: count_of(TenantStatus::Suspended),
            pending_payments: pending_payments as i64,
            approved_revenue: approved_revenue.unwrap_or(0),
            total_orders: total_orders as i64,
        })
    }

    async fn find_tenant(&self, tenant_id: i64) -> AppResult<tenants::Model> {
        tenants::Entity::find_by_id(tenant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::prelude::Uuid;

    fn suspended() -> tenants::Model {
        tenants::Model {
            id: 9,
            public_id: Uuid::nil(),
            name: "Dar Zellige".into(),
            subdomain: "zellige".into(),
            status: TenantStatus::Suspended,
            phone: None,
            email: None,
            description: None,
            logo_url: None,
            shipping_policy: None,
            return_policy: None,
            trial_ends_at: None,
            subscription_ends_at: None,
            suspended_reason: Some("fraud report".into()),
            orders_count: 12,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_reactivation_prefers_paid_period() {
        let now = Utc::now();
        let mut t = suspended();
        t.trial_ends_at = Some(now + Duration::days(2));
        t.subscription_ends_at = Some(now + Duration::days(20));
        assert_eq!(status_after_reactivation(&t, now), TenantStatus::Active);
    }

    #[test]
    fn test_reactivation_falls_back_to_trial_then_expired() {
        let now = Utc::now();
        let mut t = suspended();
        t.trial_ends_at = Some(now + Duration::days(2));
        t.subscription_ends_at = Some(now - Duration::days(1));
        assert_eq!(status_after_reactivation(&t, now), TenantStatus::Trial);

        t.trial_ends_at = Some(now - Duration::days(1));
        assert_eq!(status_after_reactivation(&t, now), TenantStatus::Expired);
    }
}
