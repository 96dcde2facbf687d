use crate::entities::tenant_entity;
use crate::error::{AppError, AppResult};
use crate::services::TenantService;
use crate::utils::extract_subdomain;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

/// Tenant resolved from the request's host
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub tenant_entity::Model);

/// Resolves `<subdomain>.<root_domain>` hosts to a tenant and refuses
/// requests for unknown, suspended or expired stores. Requests on other
/// hosts pass through without a tenant.
pub struct TenantMiddleware {
    tenant_service: TenantService,
    root_domain: String,
}

impl TenantMiddleware {
    pub fn new(tenant_service: TenantService, root_domain: impl Into<String>) -> Self {
        Self {
            tenant_service,
            root_domain: root_domain.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TenantMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TenantMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TenantMiddlewareService {
            service: Rc::new(service),
            tenant_service: self.tenant_service.clone(),
            root_domain: self.root_domain.clone(),
        }))
    }
}

pub struct TenantMiddlewareService<S> {
    service: Rc<S>,
    tenant_service: TenantService,
    root_domain: String,
}

impl<S, B> Service<ServiceRequest> for TenantMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        // X-Forwarded-Host / Forwarded are honoured by connection_info
        let host = req.connection_info().host().to_string();
        let Some(subdomain) = extract_subdomain(&host, &self.root_domain) else {
            let fut = self.service.call(req);
            return Box::pin(fut);
        };

        let service = Rc::clone(&self.service);
        let tenant_service = self.tenant_service.clone();

        Box::pin(async move {
            let tenant = tenant_service.resolve_accessible(&subdomain).await?;
            log::debug!("Resolved tenant {} for host {host}", tenant.id);
            req.extensions_mut().insert(CurrentTenant(tenant));
            service.call(req).await
        })
    }
}

/// Tenant set by [`TenantMiddleware`]; requests on the platform host have none.
pub fn current_tenant(req: &HttpRequest) -> AppResult<tenant_entity::Model> {
    req.extensions()
        .get::<CurrentTenant>()
        .map(|t| t.0.clone())
        .ok_or_else(|| AppError::NotFound("Store not found for this host".to_string()))
}
