//! # API Shared
//!
//! Shared utilities and definitions for Patient Vault APIs.
//!
//! Contains:
//! - Request/response bodies (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//! - The authentication gate (bearer parsing and token resolution)
//!
//! Transport neutral: `api-rest` adapts these to axum.

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{extract_bearer_token, Authenticator, StoreAuthenticator};
pub use dto::*;
pub use health::HealthService;
