use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted after a write commits. Advisory only: the database row is
/// the source of truth, so send failures degrade to warnings at the call
/// sites rather than failing the operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Inventory
    InventoryMovementRecorded {
        item_id: Uuid,
        direction: String,
        quantity: i32,
        new_quantity: i32,
    },
    LowStock {
        item_id: Uuid,
        quantity: i32,
        min_stock: i32,
    },

    // Sales
    SaleCreated(Uuid),
    SaleCompleted(Uuid),
    SaleCancelled(Uuid),

    // Cutting & manufacturing
    CuttingPaymentRecorded {
        cutting_job_id: Uuid,
        receipt_number: String,
    },
    ProductionBatchCompleted {
        batch_id: Uuid,
        output_item_id: Uuid,
        quantity: i32,
    },

    // Payroll & loans
    AdvanceRecorded {
        employee_id: Uuid,
        receipt_number: String,
        amount: Decimal,
    },
    LoanIssued {
        loan_id: Uuid,
        receipt_number: String,
    },
    LoanPaymentRecorded {
        loan_id: Uuid,
        amount: Decimal,
        remaining_balance: Decimal,
    },

    // Accounting
    LedgerPosted {
        debit_account: String,
        credit_account: String,
        amount: Decimal,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes events from the channel and logs them. Runs until every sender
/// is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::LowStock {
                item_id,
                quantity,
                min_stock,
            } => {
                warn!(
                    %item_id,
                    quantity,
                    min_stock,
                    "item at or below reorder threshold"
                );
            }
            other => {
                info!(event = ?other, "event processed");
            }
        }
    }

    info!("Event processing loop stopped");
}
