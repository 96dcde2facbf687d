use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Orders {
    Table,
    TenantId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_tenant_created_at")
                    .table(Orders::Table)
                    .col(Orders::TenantId)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Partial indexes using raw statement (SeaQuery doesn't support WHERE on index yet)
        let stmts = [
            "CREATE INDEX IF NOT EXISTS idx_orders_pending ON orders(tenant_id) WHERE status = 'pending'",
            "CREATE INDEX IF NOT EXISTS idx_payments_pending ON payments(created_at) WHERE status = 'pending'",
        ];
        for sql in stmts {
            let stmt = sea_orm::Statement::from_string(manager.get_database_backend(), sql.to_owned());
            manager.get_connection().execute(stmt).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_orders_tenant_created_at")
                    .table(Orders::Table)
                    .to_owned(),
            )
            .await?;
        for sql in [
            "DROP INDEX IF EXISTS idx_orders_pending",
            "DROP INDEX IF EXISTS idx_payments_pending",
        ] {
            let stmt = sea_orm::Statement::from_string(manager.get_database_backend(), sql.to_owned());
            manager.get_connection().execute(stmt).await?;
        }
        Ok(())
    }
}
