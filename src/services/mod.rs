pub mod admin_service;
pub mod auth_service;
pub mod billing_service;
pub mod dashboard_service;
pub mod order_service;
pub mod product_service;
pub mod shipping_service;
pub mod storefront_service;
pub mod tenant_service;

pub use admin_service::*;
pub use auth_service::*;
pub use billing_service::*;
pub use dashboard_service::*;
pub use order_service::*;
pub use product_service::*;
pub use shipping_service::*;
pub use storefront_service::*;
pub use tenant_service::*;
