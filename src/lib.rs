//! Plantation API Library
//!
//! Backend for plantation and estate management: lands, contractors, cutting
//! jobs, manufacturing batches, inventory, payroll, loans, accounting, and
//! sales. Grouped writes (a sale with its lines, a payment with its receipt
//! number, a movement with its log row) always commit atomically.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod openapi;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let services = handlers::AppServices::new(
            db.clone(),
            event_sender.clone(),
            config.inventory.allow_negative_stock,
        );
        Self {
            db,
            config,
            event_sender,
            services,
        }
    }
}

/// All versioned API routes, to be nested under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::lands::lands_routes())
        .merge(handlers::contractors::contractors_routes())
        .merge(handlers::inventory::inventory_routes())
        .merge(handlers::sales::sales_routes())
        .merge(handlers::cutting::cutting_routes())
        .merge(handlers::manufacturing::manufacturing_routes())
        .merge(handlers::payroll::payroll_routes())
        .merge(handlers::loans::loans_routes())
        .merge(handlers::accounting::accounting_routes())
}
