pub mod communes;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod products;
pub mod subscriptions;
pub mod tenants;
pub mod users;
pub mod wilayas;

pub use communes as commune_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use payments as payment_entity;
pub use products as product_entity;
pub use subscriptions as subscription_entity;
pub use tenants as tenant_entity;
pub use users as user_entity;
pub use wilayas as wilaya_entity;

pub use orders::{DeliveryType, OrderStatus};
pub use payments::{PaymentMethod, PaymentStatus};
pub use subscriptions::{SubscriptionPlan, SubscriptionStatus};
pub use tenants::{TenantAccess, TenantStatus};
pub use users::UserRole;
