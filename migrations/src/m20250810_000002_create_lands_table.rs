use sea_orm_migration::prelude::*;

use crate::m20250810_000001_create_contractors_table::Contractors;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lands::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lands::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Lands::Name).string().not_null())
                    .col(ColumnDef::new(Lands::Location).string().null())
                    .col(
                        ColumnDef::new(Lands::AreaHectares)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Lands::Crop).string().null())
                    .col(ColumnDef::new(Lands::ContractorId).uuid().null())
                    .col(ColumnDef::new(Lands::Notes).text().null())
                    .col(ColumnDef::new(Lands::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Lands::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lands_contractor")
                            .from(Lands::Table, Lands::ContractorId)
                            .to(Contractors::Table, Contractors::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lands::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Lands {
    Table,
    Id,
    Name,
    Location,
    AreaHectares,
    Crop,
    ContractorId,
    Notes,
    CreatedAt,
    UpdatedAt,
}
