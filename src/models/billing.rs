use crate::entities::{
    PaymentMethod, PaymentStatus, SubscriptionPlan, SubscriptionStatus, TenantStatus,
    payment_entity, subscription_entity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
}

impl From<subscription_entity::Model> for SubscriptionResponse {
    fn from(m: subscription_entity::Model) -> Self {
        Self {
            plan: m.plan,
            status: m.status,
            current_period_start: m.current_period_start,
            current_period_end: m.current_period_end,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanPriceResponse {
    pub plan: SubscriptionPlan,
    /// DZD per month
    pub monthly_price: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillingOverviewResponse {
    pub tenant_status: TenantStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription: Option<SubscriptionResponse>,
    pub plans: Vec<PlanPriceResponse>,
    pub pending_payment: Option<PaymentResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitPaymentRequest {
    pub plan: SubscriptionPlan,
    #[schema(example = 3)]
    pub months: i32,
    pub method: PaymentMethod,
    /// Uploaded receipt (BaridiMob screenshot, CCP slip, transfer order)
    #[schema(example = "https://cdn.example.dz/receipts/abc.jpg")]
    pub proof_url: String,
    pub payer_note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub tenant_id: i64,
    pub reference: String,
    pub plan: SubscriptionPlan,
    pub months: i32,
    pub amount: i64,
    pub method: PaymentMethod,
    pub proof_url: String,
    pub payer_note: Option<String>,
    pub status: PaymentStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<payment_entity::Model> for PaymentResponse {
    fn from(m: payment_entity::Model) -> Self {
        Self {
            id: m.id,
            tenant_id: m.tenant_id,
            reference: m.reference,
            plan: m.plan,
            months: m.months,
            amount: m.amount,
            method: m.method,
            proof_url: m.proof_url,
            payer_note: m.payer_note,
            status: m.status,
            rejection_reason: m.rejection_reason,
            reviewed_at: m.reviewed_at,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RejectPaymentRequest {
    pub reason: String,
}
