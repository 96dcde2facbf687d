use crate::entities::{
    SubscriptionPlan, SubscriptionStatus, TenantStatus, UserRole, subscription_entity as subscriptions,
    tenant_entity as tenants, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    trial_days: i64,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, trial_days: i64) -> Self {
        Self {
            pool,
            jwt_service,
            trial_days,
        }
    }

    /// Creates the tenant (on trial), its owner account and the trialing
    /// subscription in one transaction.
    pub async fn register(&self, request: RegisterMerchantRequest) -> AppResult<AuthResponse> {
        let full_name = require_text("Full name", &request.full_name, 2, 120)?;
        let email = validate_email(&request.email)?;
        validate_password(&request.password)?;
        let phone = match request.phone.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(p) => Some(validate_dz_phone(p)?),
        };
        let store_name = require_text("Store name", &request.store_name, 2, 120)?;
        let subdomain = validate_subdomain(&request.subdomain)?;

        let email_taken = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?
            .is_some();
        if email_taken {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let subdomain_taken = tenants::Entity::find()
            .filter(tenants::Column::Subdomain.eq(subdomain.as_str()))
            .one(&self.pool)
            .await?
            .is_some();
        if subdomain_taken {
            return Err(AppError::Conflict("Subdomain is already taken".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();
        let trial_ends_at = now + Duration::days(self.trial_days);

        let txn = self.pool.begin().await?;

        let tenant = tenants::ActiveModel {
            public_id: Set(Uuid::new_v4()),
            name: Set(store_name),
            subdomain: Set(subdomain.clone()),
            status: Set(TenantStatus::Trial),
            phone: Set(phone.clone()),
            email: Set(Some(email.clone())),
            trial_ends_at: Set(Some(trial_ends_at)),
            orders_count: Set(0),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::conflict_on_duplicate(e, "Subdomain is already taken"))?;

        let user = users::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            full_name: Set(full_name),
            phone: Set(phone),
            role: Set(UserRole::Merchant),
            tenant_id: Set(Some(tenant.id)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::conflict_on_duplicate(e, "Email is already registered"))?;

        subscriptions::ActiveModel {
            tenant_id: Set(tenant.id),
            plan: Set(SubscriptionPlan::Basic),
            status: Set(SubscriptionStatus::Trialing),
            current_period_start: Set(Some(now)),
            current_period_end: Set(Some(trial_ends_at)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Registered store '{}' (tenant {}) for user {}",
            subdomain,
            tenant.id,
            user.id
        );

        self.issue_tokens(user, Some(tenant))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_ascii_lowercase();
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        // Gated merchants can still sign in to see billing and renew
        let tenant = self.load_tenant(user.tenant_id).await?;
        self.issue_tokens(user, tenant)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user = users::Entity::find_by_id(claims.user_id()?)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        let tenant = self.load_tenant(user.tenant_id).await?;
        self.issue_tokens(user, tenant)
    }

    pub async fn me(&self, user_id: i64) -> AppResult<MeResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let tenant = self.load_tenant(user.tenant_id).await?;

        Ok(MeResponse {
            user: user.into(),
            tenant: tenant.map(Into::into),
        })
    }

    /// Creates the configured platform operator account if it is missing.
    pub async fn ensure_super_admin(&self, email: &str, password: &str) -> AppResult<()> {
        let email = validate_email(email)?;
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?;

        if let Some(user) = existing {
            if user.role != UserRole::SuperAdmin {
                log::warn!("Admin email {} belongs to a non-admin account", email);
            }
            return Ok(());
        }

        let now = Utc::now();
        let user = users::ActiveModel {
            email: Set(email),
            password_hash: Set(hash_password(password)?),
            full_name: Set("Platform Admin".to_string()),
            role: Set(UserRole::SuperAdmin),
            tenant_id: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Created super-admin account {}", user.id);
        Ok(())
    }

    async fn load_tenant(&self, tenant_id: Option<i64>) -> AppResult<Option<tenants::Model>> {
        match tenant_id {
            Some(id) => Ok(tenants::Entity::find_by_id(id).one(&self.pool).await?),
            None => Ok(None),
        }
    }

    fn issue_tokens(
        &self,
        user: users::Model,
        tenant: Option<tenants::Model>,
    ) -> AppResult<AuthResponse> {
        let access_token =
            self.jwt_service
                .generate_access_token(user.id, user.role, user.tenant_id)?;
        let refresh_token =
            self.jwt_service
                .generate_refresh_token(user.id, user.role, user.tenant_id)?;

        Ok(AuthResponse {
            user: user.into(),
            tenant: tenant.map(Into::into),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;
    use sea_orm::PaginatorTrait;

    fn signup(email: &str, subdomain: &str) -> RegisterMerchantRequest {
        RegisterMerchantRequest {
            full_name: "Amina Benali".into(),
            email: email.into(),
            password: "Password123".into(),
            phone: Some("0661234567".into()),
            store_name: "Boutique Amina".into(),
            subdomain: subdomain.into(),
        }
    }

    fn service(db: DatabaseConnection) -> AuthService {
        AuthService::new(db, JwtService::new("test-secret", 900, 86_400), 14)
    }

    #[tokio::test]
    async fn test_register_opens_trial_store() {
        let db = setup_db().await;
        let auth = service(db.clone());

        let response = auth.register(signup("Amina@Example.dz", "Amina")).await.unwrap();
        let tenant = response.tenant.unwrap();
        assert_eq!(tenant.subdomain, "amina");
        assert_eq!(tenant.status, TenantStatus::Trial);
        assert_eq!(response.user.email, "amina@example.dz");
        assert_eq!(response.user.role, UserRole::Merchant);
        assert_eq!(response.user.tenant_id, Some(tenant.id));

        let subscription = subscriptions::Entity::find()
            .filter(subscriptions::Column::TenantId.eq(tenant.id))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(subscription.status, SubscriptionStatus::Trialing);
        assert_eq!(subscription.plan, SubscriptionPlan::Basic);

        let login = auth
            .login(LoginRequest {
                email: "amina@example.dz".into(),
                password: "Password123".into(),
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, response.user.id);
    }

    #[tokio::test]
    async fn test_register_conflicts_leave_nothing_behind() {
        let db = setup_db().await;
        let auth = service(db.clone());
        auth.register(signup("amina@example.dz", "amina")).await.unwrap();

        let err = auth
            .register(signup("other@example.dz", "amina"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("Subdomain")));

        let err = auth
            .register(signup("amina@example.dz", "second-store"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("Email")));

        assert_eq!(tenants::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(users::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(subscriptions::Entity::find().count(&db).await.unwrap(), 1);
    }
}
