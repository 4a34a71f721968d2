use sea_orm_migration::prelude::*;

use crate::m20250810_000004_create_inventory_tables::InventoryItems;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductionBatches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionBatches::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionBatches::BatchNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ProductionBatches::OutputItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionBatches::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionBatches::Status)
                            .string()
                            .not_null()
                            .default("planned"),
                    )
                    .col(ColumnDef::new(ProductionBatches::Notes).text().null())
                    .col(
                        ColumnDef::new(ProductionBatches::StartedAt)
                            .timestamp()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProductionBatches::CompletedAt)
                            .timestamp()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProductionBatches::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionBatches::UpdatedAt)
                            .timestamp()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_production_batches_output_item")
                            .from(ProductionBatches::Table, ProductionBatches::OutputItemId)
                            .to(InventoryItems::Table, InventoryItems::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductionBatches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProductionBatches {
    Table,
    Id,
    BatchNumber,
    OutputItemId,
    Quantity,
    Status,
    Notes,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
