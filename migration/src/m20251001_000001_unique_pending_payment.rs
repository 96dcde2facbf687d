use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Older duplicates would block the unique index; only the latest stays pending
        let stmts = [
            "UPDATE payments p SET status = 'rejected', rejection_reason = 'Superseded by a newer payment', updated_at = NOW() \
             WHERE p.status = 'pending' AND EXISTS (SELECT 1 FROM payments q WHERE q.tenant_id = p.tenant_id AND q.status = 'pending' AND q.id > p.id)",
            "DROP INDEX IF EXISTS idx_payments_pending",
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_payments_one_pending ON payments(tenant_id) WHERE status = 'pending'",
        ];
        for sql in stmts {
            let stmt = Statement::from_string(manager.get_database_backend(), sql.to_owned());
            manager.get_connection().execute(stmt).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for sql in [
            "DROP INDEX IF EXISTS uq_payments_one_pending",
            "CREATE INDEX IF NOT EXISTS idx_payments_pending ON payments(created_at) WHERE status = 'pending'",
        ] {
            let stmt = Statement::from_string(manager.get_database_backend(), sql.to_owned());
            manager.get_connection().execute(stmt).await?;
        }
        Ok(())
    }
}
