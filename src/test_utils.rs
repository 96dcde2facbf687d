//! In-memory SQLite database for service tests.

use crate::entities::{
    SubscriptionPlan, SubscriptionStatus, TenantStatus, commune_entity as communes,
    order_entity as orders, order_item_entity as order_items, payment_entity as payments,
    product_entity as products, subscription_entity as subscriptions, tenant_entity as tenants,
    user_entity as users, wilaya_entity as wilayas,
};
use chrono::{DateTime, Utc};
use sea_orm::prelude::Uuid;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait,
    Schema, Set, Statement,
};

/// Same partial index the migrations create on Postgres.
const UNIQUE_PENDING_PAYMENT: &str =
    "CREATE UNIQUE INDEX uq_payments_one_pending ON payments(tenant_id) WHERE status = 'pending'";

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let backend = db.get_database_backend();
    let schema = Schema::new(DbBackend::Sqlite);

    let tables = vec![
        schema.create_table_from_entity(tenants::Entity),
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(subscriptions::Entity),
        schema.create_table_from_entity(payments::Entity),
        schema.create_table_from_entity(products::Entity),
        schema.create_table_from_entity(orders::Entity),
        schema.create_table_from_entity(order_items::Entity),
        schema.create_table_from_entity(wilayas::Entity),
        schema.create_table_from_entity(communes::Entity),
    ];
    for table in tables {
        db.execute(backend.build(&table)).await.unwrap();
    }
    db.execute(Statement::from_string(backend, UNIQUE_PENDING_PAYMENT.to_owned()))
        .await
        .unwrap();

    db
}

pub async fn seed_tenant(
    db: &DatabaseConnection,
    subdomain: &str,
    status: TenantStatus,
    trial_ends_at: Option<DateTime<Utc>>,
    subscription_ends_at: Option<DateTime<Utc>>,
) -> tenants::Model {
    let now = Utc::now();
    tenants::ActiveModel {
        public_id: Set(Uuid::new_v4()),
        name: Set(format!("Boutique {subdomain}")),
        subdomain: Set(subdomain.to_string()),
        status: Set(status),
        trial_ends_at: Set(trial_ends_at),
        subscription_ends_at: Set(subscription_ends_at),
        orders_count: Set(0),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_subscription(
    db: &DatabaseConnection,
    tenant_id: i64,
    status: SubscriptionStatus,
    current_period_end: Option<DateTime<Utc>>,
) -> subscriptions::Model {
    let now = Utc::now();
    subscriptions::ActiveModel {
        tenant_id: Set(tenant_id),
        plan: Set(SubscriptionPlan::Basic),
        status: Set(status),
        current_period_start: Set(Some(now)),
        current_period_end: Set(current_period_end),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_product(
    db: &DatabaseConnection,
    tenant_id: i64,
    name: &str,
    price: i64,
    stock: i32,
) -> products::Model {
    let now = Utc::now();
    products::ActiveModel {
        tenant_id: Set(tenant_id),
        name: Set(name.to_string()),
        price: Set(price),
        stock: Set(stock),
        images: Set(serde_json::json!([])),
        is_active: Set(true),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_wilaya(
    db: &DatabaseConnection,
    code: i32,
    name: &str,
    home_delivery_fee: i64,
    desk_delivery_fee: i64,
) -> wilayas::Model {
    wilayas::ActiveModel {
        code: Set(code),
        name: Set(name.to_string()),
        name_ar: Set(String::new()),
        home_delivery_fee: Set(home_delivery_fee),
        desk_delivery_fee: Set(desk_delivery_fee),
        is_active: Set(true),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn reload_tenant(db: &DatabaseConnection, tenant_id: i64) -> tenants::Model {
    tenants::Entity::find_by_id(tenant_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
}

pub async fn reload_product(db: &DatabaseConnection, product_id: i64) -> products::Model {
    products::Entity::find_by_id(product_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
}
