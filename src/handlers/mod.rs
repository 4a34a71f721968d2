pub mod accounting;
pub mod common;
pub mod contractors;
pub mod cutting;
pub mod health;
pub mod inventory;
pub mod lands;
pub mod loans;
pub mod manufacturing;
pub mod payroll;
pub mod sales;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub lands: crate::services::lands::LandService,
    pub contractors: crate::services::contractors::ContractorService,
    pub inventory: crate::services::inventory::InventoryService,
    pub sales: crate::services::sales::SaleService,
    pub cutting: crate::services::cutting::CuttingService,
    pub manufacturing: crate::services::manufacturing::ManufacturingService,
    pub payroll: crate::services::payroll::PayrollService,
    pub loans: crate::services::loans::LoanService,
    pub accounting: crate::services::accounting::AccountingService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, allow_negative_stock: bool) -> Self {
        let inventory = crate::services::inventory::InventoryService::new(
            db_pool.clone(),
            event_sender.clone(),
            allow_negative_stock,
        );
        Self {
            lands: crate::services::lands::LandService::new(db_pool.clone()),
            contractors: crate::services::contractors::ContractorService::new(db_pool.clone()),
            sales: crate::services::sales::SaleService::new(
                db_pool.clone(),
                event_sender.clone(),
                inventory.clone(),
            ),
            cutting: crate::services::cutting::CuttingService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            manufacturing: crate::services::manufacturing::ManufacturingService::new(
                db_pool.clone(),
                event_sender.clone(),
                inventory.clone(),
            ),
            payroll: crate::services::payroll::PayrollService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            loans: crate::services::loans::LoanService::new(db_pool.clone(), event_sender.clone()),
            accounting: crate::services::accounting::AccountingService::new(
                db_pool,
                event_sender,
            ),
            inventory,
        }
    }
}
