pub use sea_orm_migration::prelude::*;

mod m20250810_000001_create_contractors_table;
mod m20250810_000002_create_lands_table;
mod m20250810_000003_create_employees_table;
mod m20250810_000004_create_inventory_tables;
mod m20250810_000005_create_sales_tables;
mod m20250810_000006_create_cutting_tables;
mod m20250810_000007_create_production_batches_table;
mod m20250810_000008_create_advance_payments_table;
mod m20250810_000009_create_loans_tables;
mod m20250810_000010_create_ledger_entries_table;
mod m20250810_000011_create_receipt_counters_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250810_000001_create_contractors_table::Migration),
            Box::new(m20250810_000002_create_lands_table::Migration),
            Box::new(m20250810_000003_create_employees_table::Migration),
            Box::new(m20250810_000004_create_inventory_tables::Migration),
            Box::new(m20250810_000005_create_sales_tables::Migration),
            Box::new(m20250810_000006_create_cutting_tables::Migration),
            Box::new(m20250810_000007_create_production_batches_table::Migration),
            Box::new(m20250810_000008_create_advance_payments_table::Migration),
            Box::new(m20250810_000009_create_loans_tables::Migration),
            Box::new(m20250810_000010_create_ledger_entries_table::Migration),
            Box::new(m20250810_000011_create_receipt_counters_table::Migration),
        ]
    }
}
