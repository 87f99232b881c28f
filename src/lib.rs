//! Brigade Engine
//!
//! Derived-state accounting engine for multi-location restaurant groups:
//! inventory ledger, shift and payroll accrual, order costing, payment and
//! tip settlement, period accounting reports, and training alerts.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod locks;
pub mod metrics;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared state handed to the embedding layer: the store, the loaded
/// configuration, the event channel, and one instance of every service.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: services::Services,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let services = services::Services::new(db.clone(), event_sender.clone());
        Self {
            db,
            config,
            event_sender,
            services,
        }
    }
}
