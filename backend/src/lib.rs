pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod scope_guard;
pub mod seed;
pub mod services;
pub mod store;

use std::sync::Arc;

use config::{Config, ReviewerScope};
use services::{ledger::BalanceLedger, leave_workflow::LeaveWorkflow, slot_registry::SlotRegistry};
use store::Store;

/// Shared application state available to all handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub reviewer_scope: ReviewerScope,
    pub leave: LeaveWorkflow,
    pub slots: SlotRegistry,
}

impl AppState {
    /// Wires the services over `store` and installs the daily slot schedule.
    pub async fn new(cfg: &Config, store: Arc<dyn Store>) -> error::Result<Self> {
        let ledger = Arc::new(BalanceLedger::new(store.clone(), cfg.monthly_leave_allowance));
        let leave = LeaveWorkflow::new(store.clone(), ledger, cfg.reviewer_scope, cfg.timezone);
        let slots = SlotRegistry::new(store.clone());
        slots.install_schedule().await?;

        Ok(Self {
            store,
            jwt_secret: cfg.jwt_secret.clone(),
            jwt_expiry_hours: cfg.jwt_expiry_hours,
            reviewer_scope: cfg.reviewer_scope,
            leave,
            slots,
        })
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl axum::extract::FromRef<AppState> for LeaveWorkflow {
    fn from_ref(state: &AppState) -> Self {
        state.leave.clone()
    }
}

impl axum::extract::FromRef<AppState> for SlotRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.slots.clone()
    }
}
