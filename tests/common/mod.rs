use std::sync::Arc;

use chrono::Utc;
use plantation_api::{
    config::{AppConfig, InventoryConfig},
    db::{self, DbPool},
    events::{self, EventSender},
    handlers::AppServices,
    services::inventory::CreateItemRequest,
    AppState,
};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Test harness backed by a fresh in-memory SQLite database per instance.
pub struct TestApp {
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_inventory(InventoryConfig::default()).await
    }

    pub async fn allowing_negative_stock() -> Self {
        Self::with_inventory(InventoryConfig {
            allow_negative_stock: true,
        })
        .await
    }

    async fn with_inventory(inventory: InventoryConfig) -> Self {
        // A unique shared-cache name keeps each harness isolated while the
        // pool holds more than one connection.
        let url = format!(
            "sqlite:file:test_{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );
        let pool = db::establish_connection(&url)
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let cfg = AppConfig {
            database_url: url,
            host: "127.0.0.1".to_string(),
            port: 18_080,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: 1,
            db_min_connections: 1,
            cors_allowed_origins: None,
            inventory,
        };

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(Arc::new(pool), cfg, event_sender);
        Self {
            state,
            _event_task: event_task,
        }
    }

    pub fn db(&self) -> &Arc<DbPool> {
        &self.state.db
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    /// Seeds one inventory item and returns its id.
    pub async fn seed_item(&self, sku: &str, quantity: i32, unit_price: Decimal) -> Uuid {
        let item = self
            .services()
            .inventory
            .create_item(CreateItemRequest {
                sku: sku.to_string(),
                name: format!("Item {}", sku),
                quantity,
                min_stock: 0,
                max_stock: None,
                unit_price,
            })
            .await
            .expect("failed to seed item");
        item.id
    }

    /// Seeds an employee and returns its id.
    pub async fn seed_employee(&self, name: &str, daily_wage: Decimal) -> Uuid {
        let employee = self
            .services()
            .payroll
            .create_employee(plantation_api::services::payroll::CreateEmployeeRequest {
                name: name.to_string(),
                role: None,
                daily_wage,
            })
            .await
            .expect("failed to seed employee");
        employee.id
    }

    /// Seeds a land with an owning contractor, returning (land, contractor).
    pub async fn seed_land_with_contractor(&self) -> (Uuid, Uuid) {
        let contractor = self
            .services()
            .contractors
            .create_contractor(
                plantation_api::services::contractors::CreateContractorRequest {
                    name: "Harvest Co".to_string(),
                    phone: None,
                    address: None,
                },
            )
            .await
            .expect("failed to seed contractor");
        let land = self
            .services()
            .lands
            .create_land(plantation_api::services::lands::CreateLandRequest {
                name: "North block".to_string(),
                location: None,
                area_hectares: Decimal::new(125, 1),
                crop: Some("sugarcane".to_string()),
                contractor_id: Some(contractor.id),
                notes: None,
            })
            .await
            .expect("failed to seed land");
        (land.id, contractor.id)
    }

    /// Creates a cutting job, finishes it, and returns its id ready for payment.
    pub async fn seed_finished_cutting_job(&self) -> Uuid {
        let (land_id, contractor_id) = self.seed_land_with_contractor().await;
        let job = self
            .services()
            .cutting
            .create_job(plantation_api::services::cutting::CreateCuttingJobRequest {
                land_id,
                contractor_id,
                scheduled_date: Utc::now(),
                notes: None,
            })
            .await
            .expect("failed to seed cutting job");
        self.services()
            .cutting
            .finish_job(job.id, Decimal::new(42, 0))
            .await
            .expect("failed to finish cutting job");
        job.id
    }
}
