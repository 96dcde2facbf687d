use crate::config::BillingConfig;
use crate::entities::{
    PaymentStatus, SubscriptionPlan, SubscriptionStatus, TenantStatus,
    payment_entity as payments, subscription_entity as subscriptions, tenant_entity as tenants,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    BillingOverviewResponse, PaginatedResponse, PaginationParams, PaymentQuery, PaymentResponse,
    PlanPriceResponse, SubmitPaymentRequest,
};
use crate::utils::{generate_payment_reference, optional_text, require_text};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

pub const MAX_PAYMENT_MONTHS: i32 = 12;
pub const DAYS_PER_BILLED_MONTH: i64 = 30;

const PAYMENT_PENDING: &str = "A payment is already awaiting review";

/// New period end: paid time is stacked on top of any time still remaining.
pub fn extend_period(
    now: DateTime<Utc>,
    current_end: Option<DateTime<Utc>>,
    months: i32,
) -> DateTime<Utc> {
    let base = match current_end {
        Some(end) if end > now => end,
        _ => now,
    };
    base + Duration::days(i64::from(months) * DAYS_PER_BILLED_MONTH)
}

#[derive(Clone)]
pub struct BillingService {
    pool: DatabaseConnection,
    prices: BillingConfig,
}

impl BillingService {
    pub fn new(pool: DatabaseConnection, prices: BillingConfig) -> Self {
        Self { pool, prices }
    }

    pub fn monthly_price(&self, plan: SubscriptionPlan) -> i64 {
        match plan {
            SubscriptionPlan::Basic => self.prices.basic_monthly_price,
            SubscriptionPlan::Pro => self.prices.pro_monthly_price,
        }
    }

    fn plans(&self) -> Vec<PlanPriceResponse> {
        [SubscriptionPlan::Basic, SubscriptionPlan::Pro]
            .into_iter()
            .map(|plan| PlanPriceResponse {
                plan,
                monthly_price: self.monthly_price(plan),
            })
            .collect()
    }

    pub async fn overview(&self, tenant_id: i64) -> AppResult<BillingOverviewResponse> {
        let tenant = tenants::Entity::find_by_id(tenant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;
        let subscription = subscriptions::Entity::find()
            .filter(subscriptions::Column::TenantId.eq(tenant_id))
            .one(&self.pool)
            .await?;
        let pending = self.find_pending(tenant_id).await?;

        Ok(BillingOverviewResponse {
            tenant_status: tenant.status,
            trial_ends_at: tenant.trial_ends_at,
            subscription: subscription.map(Into::into),
            plans: self.plans(),
            pending_payment: pending.map(Into::into),
        })
    }

    /// Records a manual payment awaiting review. Amount comes from the
    /// configured plan price, never from the client.
    pub async fn submit_payment(
        &self,
        tenant_id: i64,
        request: SubmitPaymentRequest,
    ) -> AppResult<PaymentResponse> {
        if !(1..=MAX_PAYMENT_MONTHS).contains(&request.months) {
            return Err(AppError::ValidationError(format!(
                "Months must be between 1 and {MAX_PAYMENT_MONTHS}"
            )));
        }
        let proof_url = require_text("Proof URL", &request.proof_url, 10, 512)?;
        if !(proof_url.starts_with("https://") || proof_url.starts_with("http://")) {
            return Err(AppError::ValidationError("Invalid proof URL".to_string()));
        }
        let payer_note = optional_text("Note", request.payer_note.as_deref(), 1000)?;

        if self.find_pending(tenant_id).await?.is_some() {
            return Err(AppError::Conflict(PAYMENT_PENDING.to_string()));
        }

        let amount = self
            .monthly_price(request.plan)
            .checked_mul(i64::from(request.months))
            .ok_or_else(|| AppError::ValidationError("Payment amount is too large".to_string()))?;

        let now = Utc::now();
        let payment = payments::ActiveModel {
            tenant_id: Set(tenant_id),
            reference: Set(generate_payment_reference()),
            plan: Set(request.plan),
            months: Set(request.months),
            amount: Set(amount),
            method: Set(request.method),
            proof_url: Set(proof_url),
            payer_note: Set(payer_note),
            status: Set(PaymentStatus::Pending),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_duplicate(e, PAYMENT_PENDING))?;

        log::info!(
            "Tenant {} submitted payment {} ({} x{} = {} DZD)",
            tenant_id,
            payment.reference,
            payment.plan,
            payment.months,
            payment.amount
        );
        Ok(payment.into())
    }

    /// Payments of one tenant, or of every tenant when `tenant_id` is `None`.
    pub async fn list_payments(
        &self,
        tenant_id: Option<i64>,
        query: &PaymentQuery,
    ) -> AppResult<PaginatedResponse<PaymentResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = payments::Entity::find();
        if let Some(tenant_id) = tenant_id {
            select = select.filter(payments::Column::TenantId.eq(tenant_id));
        }
        if let Some(status) = query.status {
            select = select.filter(payments::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id)
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

    /// Activates the subscription for the paid months and opens the store
    /// unless an admin suspended it.
    pub async fn approve_payment(&self, payment_id: i64, admin_id: i64) -> AppResult<PaymentResponse> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let payment = self.lock_pending(&txn, payment_id).await?;

        let tenant = tenants::Entity::find_by_id(payment.tenant_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

        let subscription = subscriptions::Entity::find()
            .filter(subscriptions::Column::TenantId.eq(tenant.id))
            .one(&txn)
            .await?;

        let period_end = match &subscription {
            Some(sub) => extend_period(now, sub.current_period_end, payment.months),
            None => extend_period(now, None, payment.months),
        };

        match subscription {
            Some(sub) => {
                let continuing = sub.status == SubscriptionStatus::Active
                    && sub.current_period_end.is_some_and(|end| end > now);
                let mut model = sub.into_active_model();
                if !continuing {
                    model.current_period_start = Set(Some(now));
                }
                model.plan = Set(payment.plan);
                model.status = Set(SubscriptionStatus::Active);
                model.current_period_end = Set(Some(period_end));
                model.updated_at = Set(Some(now));
                model.update(&txn).await?;
            }
            None => {
                subscriptions::ActiveModel {
                    tenant_id: Set(tenant.id),
                    plan: Set(payment.plan),
                    status: Set(SubscriptionStatus::Active),
                    current_period_start: Set(Some(now)),
                    current_period_end: Set(Some(period_end)),
                    created_at: Set(Some(now)),
                    updated_at: Set(Some(now)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        let suspended = tenant.status == TenantStatus::Suspended;
        let tenant_id = tenant.id;
        let mut tenant_model = tenant.into_active_model();
        if !suspended {
            tenant_model.status = Set(TenantStatus::Active);
        }
        tenant_model.subscription_ends_at = Set(Some(period_end));
        tenant_model.updated_at = Set(Some(now));
        tenant_model.update(&txn).await?;

        let mut payment_model = payment.into_active_model();
        payment_model.status = Set(PaymentStatus::Approved);
        payment_model.reviewed_by = Set(Some(admin_id));
        payment_model.reviewed_at = Set(Some(now));
        payment_model.updated_at = Set(Some(now));
        let approved = payment_model.update(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Payment {} approved by admin {}: tenant {} paid until {}",
            approved.reference,
            admin_id,
            tenant_id,
            period_end
        );
        Ok(approved.into())
    }

    pub async fn reject_payment(
        &self,
        payment_id: i64,
        admin_id: i64,
        reason: &str,
    ) -> AppResult<PaymentResponse> {
        let reason = require_text("Reason", reason, 3, 500)?;
        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let payment = self.lock_pending(&txn, payment_id).await?;

        let mut model = payment.into_active_model();
        model.status = Set(PaymentStatus::Rejected);
        model.rejection_reason = Set(Some(reason));
        model.reviewed_by = Set(Some(admin_id));
        model.reviewed_at = Set(Some(now));
        model.updated_at = Set(Some(now));
        let rejected = model.update(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Payment {} rejected by admin {}",
            rejected.reference,
            admin_id
        );
        Ok(rejected.into())
    }

    /// Locks the payment for review; anything already reviewed is a 409.
    async fn lock_pending(
        &self,
        txn: &DatabaseTransaction,
        payment_id: i64,
    ) -> AppResult<payments::Model> {
        let payment = payments::Entity::find_by_id(payment_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;
        if payment.status != PaymentStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Payment is already {}",
                payment.status
            )));
        }
        Ok(payment)
    }

    async fn find_pending(&self, tenant_id: i64) -> AppResult<Option<payments::Model>> {
        Ok(payments::Entity::find()
            .filter(payments::Column::TenantId.eq(tenant_id))
            .filter(payments::Column::Status.eq(PaymentStatus::Pending))
            .one(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PaymentMethod;
    use crate::test_utils::{reload_tenant, seed_subscription, seed_tenant, setup_db};
    use chrono::TimeZone;

    fn prices() -> BillingConfig {
        BillingConfig {
            basic_monthly_price: 2900,
            pro_monthly_price: 5900,
        }
    }

    fn pro_payment(months: i32) -> SubmitPaymentRequest {
        SubmitPaymentRequest {
            plan: SubscriptionPlan::Pro,
            months,
            method: PaymentMethod::Baridimob,
            proof_url: "https://cdn.example.dz/receipts/abc.jpg".into(),
            payer_note: None,
        }
    }

    async fn subscription_of(db: &DatabaseConnection, tenant_id: i64) -> subscriptions::Model {
        subscriptions::Entity::find()
            .filter(subscriptions::Column::TenantId.eq(tenant_id))
            .one(db)
            .await
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_extend_from_now_when_lapsed() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let lapsed = Some(now - Duration::days(3));
        assert_eq!(extend_period(now, lapsed, 1), now + Duration::days(30));
        assert_eq!(extend_period(now, None, 2), now + Duration::days(60));
    }

    #[test]
    fn test_extend_stacks_on_remaining_time() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let current_end = now + Duration::days(10);
        assert_eq!(
            extend_period(now, Some(current_end), 3),
            current_end + Duration::days(90)
        );
    }

    #[test]
    fn test_monthly_price_by_plan() {
        // Pricing is pure config lookup, no connection used
        let service = BillingService::new(DatabaseConnection::Disconnected, prices());
        assert_eq!(service.monthly_price(SubscriptionPlan::Basic), 2900);
        assert_eq!(service.monthly_price(SubscriptionPlan::Pro), 5900);
        assert_eq!(service.plans().len(), 2);
    }

    #[tokio::test]
    async fn test_approval_activates_and_stacks_on_trial() {
        let db = setup_db().await;
        let now = Utc::now();
        let trial_end = now + Duration::days(3);
        let tenant = seed_tenant(&db, "amina", TenantStatus::Trial, Some(trial_end), None).await;
        seed_subscription(&db, tenant.id, SubscriptionStatus::Trialing, Some(trial_end)).await;

        let service = BillingService::new(db.clone(), prices());
        let payment = service.submit_payment(tenant.id, pro_payment(2)).await.unwrap();
        assert_eq!(payment.amount, 2 * 5900);
        assert_eq!(payment.status, PaymentStatus::Pending);

        let approved = service.approve_payment(payment.id, 1).await.unwrap();
        assert_eq!(approved.status, PaymentStatus::Approved);

        let tenant = reload_tenant(&db, tenant.id).await;
        let subscription = subscription_of(&db, tenant.id).await;
        assert_eq!(tenant.status, TenantStatus::Active);
        assert_eq!(subscription.status, SubscriptionStatus::Active);
        assert_eq!(subscription.plan, SubscriptionPlan::Pro);
        assert_eq!(subscription.current_period_end, tenant.subscription_ends_at);
        let paid_until = tenant.subscription_ends_at.unwrap();
        assert!(paid_until >= trial_end + Duration::days(60) - Duration::seconds(1));
        assert!(paid_until <= trial_end + Duration::days(60) + Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_reviewed_payment_cannot_be_reviewed_again() {
        let db = setup_db().await;
        let tenant = seed_tenant(&db, "amina", TenantStatus::Expired, None, None).await;
        let service = BillingService::new(db.clone(), prices());

        let payment = service.submit_payment(tenant.id, pro_payment(1)).await.unwrap();
        service.approve_payment(payment.id, 1).await.unwrap();

        let err = service
            .reject_payment(payment.id, 1, "Receipt unreadable")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let err = service.approve_payment(payment.id, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = payments::Entity::find_by_id(payment.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, PaymentStatus::Approved);
        assert_eq!(stored.rejection_reason, None);
    }

    #[tokio::test]
    async fn test_approval_keeps_suspension() {
        let db = setup_db().await;
        let tenant = seed_tenant(&db, "amina", TenantStatus::Suspended, None, None).await;
        let service = BillingService::new(db.clone(), prices());

        let payment = service.submit_payment(tenant.id, pro_payment(1)).await.unwrap();
        service.approve_payment(payment.id, 1).await.unwrap();

        let tenant = reload_tenant(&db, tenant.id).await;
        assert_eq!(tenant.status, TenantStatus::Suspended);
        assert!(tenant.subscription_ends_at.is_some_and(|end| end > Utc::now()));
    }

    #[tokio::test]
    async fn test_one_pending_payment_per_tenant() {
        let db = setup_db().await;
        let tenant = seed_tenant(&db, "amina", TenantStatus::Trial, None, None).await;
        let service = BillingService::new(db.clone(), prices());

        let first = service.submit_payment(tenant.id, pro_payment(1)).await.unwrap();
        let err = service.submit_payment(tenant.id, pro_payment(3)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // A racing insert that slipped past the pre-check hits the unique index
        let now = Utc::now();
        let raced = payments::ActiveModel {
            tenant_id: Set(tenant.id),
            reference: Set("PAY-RACE0001".into()),
            plan: Set(SubscriptionPlan::Basic),
            months: Set(1),
            amount: Set(2900),
            method: Set(PaymentMethod::Ccp),
            proof_url: Set("https://cdn.example.dz/receipts/race.jpg".into()),
            status: Set(PaymentStatus::Pending),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&db)
        .await
        .map_err(|e| AppError::conflict_on_duplicate(e, PAYMENT_PENDING))
        .unwrap_err();
        assert!(matches!(raced, AppError::Conflict(msg) if msg == PAYMENT_PENDING));

        // Once reviewed, a new payment can be submitted
        service
            .reject_payment(first.id, 1, "Amount does not match")
            .await
            .unwrap();
        assert!(service.submit_payment(tenant.id, pro_payment(1)).await.is_ok());
    }
}
