use sea_orm_migration::prelude::*;

use crate::m20250810_000001_create_contractors_table::Contractors;
use crate::m20250810_000002_create_lands_table::Lands;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CuttingJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CuttingJobs::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CuttingJobs::LandId).uuid().not_null())
                    .col(ColumnDef::new(CuttingJobs::ContractorId).uuid().not_null())
                    .col(
                        ColumnDef::new(CuttingJobs::ScheduledDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CuttingJobs::Status)
                            .string()
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(CuttingJobs::QuantityTonnes)
                            .decimal_len(12, 3)
                            .null(),
                    )
                    .col(ColumnDef::new(CuttingJobs::Notes).text().null())
                    .col(
                        ColumnDef::new(CuttingJobs::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CuttingJobs::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cutting_jobs_land")
                            .from(CuttingJobs::Table, CuttingJobs::LandId)
                            .to(Lands::Table, Lands::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cutting_jobs_contractor")
                            .from(CuttingJobs::Table, CuttingJobs::ContractorId)
                            .to(Contractors::Table, Contractors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CuttingPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CuttingPayments::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CuttingPayments::ReceiptNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CuttingPayments::CuttingJobId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CuttingPayments::ContractorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CuttingPayments::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CuttingPayments::PaidAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CuttingPayments::Notes).text().null())
                    .col(
                        ColumnDef::new(CuttingPayments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cutting_payments_job")
                            .from(CuttingPayments::Table, CuttingPayments::CuttingJobId)
                            .to(CuttingJobs::Table, CuttingJobs::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cutting_payments_contractor")
                            .from(CuttingPayments::Table, CuttingPayments::ContractorId)
                            .to(Contractors::Table, Contractors::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CuttingPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CuttingJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CuttingJobs {
    Table,
    Id,
    LandId,
    ContractorId,
    ScheduledDate,
    Status,
    QuantityTonnes,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum CuttingPayments {
    Table,
    Id,
    ReceiptNumber,
    CuttingJobId,
    ContractorId,
    Amount,
    PaidAt,
    Notes,
    CreatedAt,
}
