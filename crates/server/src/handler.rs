//! Application state and router.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tipcheck_client::AllowanceClient;
use tipcheck_core::ValidationService;

use crate::routes::{allowance, validation};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub validation: Arc<ValidationService>,
    pub allowance: Arc<AllowanceClient>,
}

impl AppState {
    pub fn new(validation: ValidationService, allowance: AllowanceClient) -> Self {
        Self { validation: Arc::new(validation), allowance: Arc::new(allowance) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/tips/validation", get(validation::validate_tip))
        .route("/api/v1/tips/allowance", get(allowance::get_allowance))
        .with_state(state)
}
