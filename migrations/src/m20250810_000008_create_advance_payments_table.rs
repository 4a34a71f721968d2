use sea_orm_migration::prelude::*;

use crate::m20250810_000003_create_employees_table::Employees;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdvancePayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdvancePayments::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdvancePayments::ReceiptNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AdvancePayments::EmployeeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdvancePayments::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdvancePayments::PaidAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdvancePayments::Notes).text().null())
                    .col(
                        ColumnDef::new(AdvancePayments::RecordedBy)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AdvancePayments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_advance_payments_employee")
                            .from(AdvancePayments::Table, AdvancePayments::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdvancePayments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AdvancePayments {
    Table,
    Id,
    ReceiptNumber,
    EmployeeId,
    Amount,
    PaidAt,
    Notes,
    RecordedBy,
    CreatedAt,
}
