use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One counter row per (prefix, YYMM period). Incremented inside the
        // caller's transaction so two concurrent callers can never read the
        // same sequence value.
        manager
            .create_table(
                Table::create()
                    .table(ReceiptCounters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ReceiptCounters::Prefix).string().not_null())
                    .col(ColumnDef::new(ReceiptCounters::Period).string().not_null())
                    .col(
                        ColumnDef::new(ReceiptCounters::NextSeq)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .primary_key(
                        Index::create()
                            .col(ReceiptCounters::Prefix)
                            .col(ReceiptCounters::Period),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReceiptCounters::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ReceiptCounters {
    Table,
    Prefix,
    Period,
    NextSeq,
}
