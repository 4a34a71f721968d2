pub mod advance_payment;
pub mod contractor;
pub mod cutting_job;
pub mod cutting_payment;
pub mod employee;
pub mod inventory_item;
pub mod inventory_transaction;
pub mod land;
pub mod ledger_entry;
pub mod loan;
pub mod loan_payment;
pub mod production_batch;
pub mod receipt_counter;
pub mod sale;
pub mod sale_item;
