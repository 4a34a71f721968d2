use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::Account).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Side).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::ReferenceType)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::ReferenceId).uuid().null())
                    .col(
                        ColumnDef::new(LedgerEntries::Description)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ledger_entries_account")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::Account)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum LedgerEntries {
    Table,
    Id,
    Account,
    Side,
    Amount,
    ReferenceType,
    ReferenceId,
    Description,
    OccurredAt,
    CreatedAt,
}
