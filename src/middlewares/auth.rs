use crate::entities::UserRole;
use crate::error::{AppError, AppResult};
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

// Public path table
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    excluded_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec![
                "/health",
                "/swagger-ui",
                "/swagger-ui/",
                "/api-docs/openapi.json",
                "/api/v1/store",
                "/api/v1/orders/checkout",
            ],
            prefix_paths: vec![
                "/swagger-ui/",
                "/api-docs/",
                "/api/v1/auth/",
                "/api/v1/store/",
                "/api/v1/storefront/",
                "/api/v1/shipping/",
            ],
            // Under a public prefix but still authenticated
            excluded_paths: vec!["/api/v1/auth/me"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        if self
            .excluded_paths
            .iter()
            .any(|&excluded| path.starts_with(excluded))
        {
            return false;
        }

        if self.exact_paths.contains(&path) {
            return true;
        }

        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

/// Identity attached to authenticated requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: UserRole,
    pub tenant_id: Option<i64>,
}

impl AuthUser {
    /// Tenant of a merchant account; super-admins and orphan accounts are refused.
    pub fn merchant_tenant_id(&self) -> AppResult<i64> {
        match (self.role, self.tenant_id) {
            (UserRole::Merchant, Some(tenant_id)) => Ok(tenant_id),
            _ => Err(AppError::PermissionDenied),
        }
    }

    pub fn require_super_admin(&self) -> AppResult<()> {
        if self.role == UserRole::SuperAdmin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflight
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if self.public_paths.is_public_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            let error = AppError::AuthError("Missing access token".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        let auth_user = self
            .jwt_service
            .verify_access_token(token)
            .and_then(|claims| {
                Ok(AuthUser {
                    user_id: claims.user_id()?,
                    role: claims.role,
                    tenant_id: claims.tenant_id,
                })
            });

        match auth_user {
            Ok(auth_user) => {
                req.extensions_mut().insert(auth_user);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(_) => {
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

/// Identity set by [`AuthMiddleware`]
pub fn current_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        let paths = PublicPaths::new();
        assert!(paths.is_public_path("/api/v1/auth/login"));
        assert!(paths.is_public_path("/api/v1/storefront/amina/products"));
        assert!(paths.is_public_path("/api/v1/orders/checkout"));
        assert!(paths.is_public_path("/api/v1/store"));
        assert!(paths.is_public_path("/api/v1/shipping/wilayas"));
        assert!(!paths.is_public_path("/api/v1/auth/me"));
        assert!(!paths.is_public_path("/api/v1/orders"));
        assert!(!paths.is_public_path("/api/v1/orders/12"));
        assert!(!paths.is_public_path("/api/v1/admin/tenants"));
        assert!(!paths.is_public_path("/api/v1/store-settings"));
    }

    #[test]
    fn test_merchant_tenant_id() {
        let merchant = AuthUser {
            user_id: 1,
            role: UserRole::Merchant,
            tenant_id: Some(9),
        };
        assert_eq!(merchant.merchant_tenant_id().unwrap(), 9);
        assert!(merchant.require_super_admin().is_err());

        let admin = AuthUser {
            user_id: 2,
            role: UserRole::SuperAdmin,
            tenant_id: None,
        };
        assert!(admin.merchant_tenant_id().is_err());
        assert!(admin.require_super_admin().is_ok());
    }
}
