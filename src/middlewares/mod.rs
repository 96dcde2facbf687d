pub mod auth;
pub mod cors;
pub mod tenant;

pub use auth::{AuthMiddleware, AuthUser, current_user};
pub use cors::create_cors;
pub use tenant::{CurrentTenant, TenantMiddleware, current_tenant};
