//! Record identifiers and sharded storage paths.
//!
//! Every stored document (patients and users alike) is keyed by a UUID written in a single
//! canonical form: **32 lowercase hexadecimal characters**, no hyphens. This is what
//! `Uuid::new_v4().simple().to_string()` produces and is the only form accepted from the outside
//! world, which keeps path derivation deterministic.
//!
//! ## Sharded directory layout
//! For a canonical UUID `u`, a document lives at:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>.json`
//!
//! Example:
//! `patient_data/patients/55/0e/550e8400e29b41d4a716446655440000.json`
//!
//! Two levels of two hex characters cap the fan-out of any one directory at 256 entries.

mod shardable;

pub use shardable::ShardableUuid;

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// Input was not a canonical identifier
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
