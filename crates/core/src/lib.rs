//! # Patient Vault Core
//!
//! Core business logic for the owner-scoped patient record API.
//!
//! This crate contains the data model and the operations over it:
//! - `Patient` and `User` records and their identifiers
//! - The existence and ownership checks every single-record operation runs through
//! - Payload sanitisation (blank-field removal, owner stripping)
//! - Store traits with in-memory and sharded JSON file implementations
//! - `PatientService`, the list/get/create/update/delete operations
//!
//! **No API concerns**: bearer-token extraction, HTTP servers and response shaping belong in
//! `api-shared` and `api-rest`.

pub mod access;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod patient;
pub mod sanitize;
pub mod service;
pub mod store;
pub mod user;

pub use access::{ensure_found, require_ownership, Owned, Principal};
pub use config::CoreConfig;
pub use constants::DEFAULT_PATIENT_DATA_DIR;
pub use error::{ErrorKind, VaultError, VaultResult};
pub use ids::{PatientId, UserId};
pub use patient::{NewPatient, Patient, PatientSchema};
pub use sanitize::{strip_blank_fields, without_owner};
pub use service::PatientService;
pub use store::{file::FileStore, memory::MemoryStore, PatientStore, UserStore};
pub use user::{HashedPassword, NewUser, TokenDigest, User};

pub use pvault_types::{EmailAddress, MobileNumber, NonEmptyText, TextError};
pub use pvault_uuid::ShardableUuid;
