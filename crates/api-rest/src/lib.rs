//! # API REST
//!
//! REST API implementation for Patient Vault.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - The request stages that run ahead of the handlers (bearer authentication, blank-field
//!   removal)
//! - Mapping core errors to status codes and JSON error bodies
//! - OpenAPI/Swagger documentation, CORS and request tracing
//!
//! Uses `api-shared` for common types and `pvault-core` for the operations themselves.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod middleware;
pub mod patients;
pub mod routes;

use api_shared::Authenticator;
use pvault_core::PatientService;
use std::sync::Arc;

pub use error::ApiError;
pub use routes::{router, ApiDoc};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub patients: PatientService,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(patients: PatientService, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            patients,
            authenticator,
        }
    }
}
