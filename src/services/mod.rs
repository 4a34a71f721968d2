pub mod accounting;
pub mod contractors;
pub mod cutting;
pub mod inventory;
pub mod lands;
pub mod loans;
pub mod manufacturing;
pub mod payroll;
pub mod sales;
pub mod sequence;
