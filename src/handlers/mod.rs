pub mod admin;
pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod health;
pub mod order;
pub mod product;
pub mod shipping;
pub mod store_settings;
pub mod storefront;

pub use admin::admin_config;
pub use auth::auth_config;
pub use billing::billing_config;
pub use dashboard::dashboard_config;
pub use health::health_config;
pub use order::order_config;
pub use product::product_config;
pub use shipping::shipping_config;
pub use store_settings::store_settings_config;
pub use storefront::{store_config, storefront_config};
