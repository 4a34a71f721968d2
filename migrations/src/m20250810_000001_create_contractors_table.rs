use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contractors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contractors::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contractors::Name).string().not_null())
                    .col(ColumnDef::new(Contractors::Phone).string().null())
                    .col(ColumnDef::new(Contractors::Address).text().null())
                    .col(
                        ColumnDef::new(Contractors::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Contractors::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contractors::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contractors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Contractors {
    Table,
    Id,
    Name,
    Phone,
    Address,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
