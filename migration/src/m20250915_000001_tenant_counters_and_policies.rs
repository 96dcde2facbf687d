use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveIden)]
enum Tenants {
    Table,
    OrdersCount,
    SuspendedReason,
    ShippingPolicy,
    ReturnPolicy,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Some deployments received these columns from hand-run patches already
        let patches = [
            "ALTER TABLE tenants ADD COLUMN IF NOT EXISTS orders_count BIGINT NOT NULL DEFAULT 0",
            "ALTER TABLE tenants ADD COLUMN IF NOT EXISTS suspended_reason TEXT NULL",
            "ALTER TABLE tenants ADD COLUMN IF NOT EXISTS shipping_policy TEXT NULL",
            "ALTER TABLE tenants ADD COLUMN IF NOT EXISTS return_policy TEXT NULL",
        ];
        for sql in patches {
            let stmt = Statement::from_string(manager.get_database_backend(), sql.to_owned());
            manager.get_connection().execute(stmt).await?;
        }

        // Counter catches up with orders created before the column existed
        let backfill = Statement::from_string(
            manager.get_database_backend(),
            "UPDATE tenants t SET orders_count = sub.cnt FROM (SELECT tenant_id, COUNT(*) AS cnt FROM orders GROUP BY tenant_id) sub WHERE sub.tenant_id = t.id AND t.orders_count < sub.cnt".to_owned(),
        );
        manager.get_connection().execute(backfill).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Tenants::Table)
                    .drop_column(Tenants::OrdersCount)
                    .drop_column(Tenants::SuspendedReason)
                    .drop_column(Tenants::ShippingPolicy)
                    .drop_column(Tenants::ReturnPolicy)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
