pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;
mod m20250901_000002_seed_wilayas;
mod m20250915_000001_tenant_counters_and_policies;
mod m20250920_000001_add_order_indexes;
mod m20251001_000001_unique_pending_payment;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_initial::Migration),
            Box::new(m20250901_000002_seed_wilayas::Migration),
            Box::new(m20250915_000001_tenant_counters_and_policies::Migration),
            Box::new(m20250920_000001_add_order_indexes::Migration),
            Box::new(m20251001_000001_unique_pending_payment::Migration),
        ]
    }
}
