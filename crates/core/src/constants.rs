//! Constants shared across the core crate.

/// Default root directory for stored documents.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "/patient_data";

/// Directory (under the data root) holding patient documents.
pub const PATIENTS_DIR_NAME: &str = "patients";

/// Directory (under the data root) holding user documents.
pub const USERS_DIR_NAME: &str = "users";

/// Extension used for every stored document.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Patient attributes required when no override is configured.
pub const DEFAULT_REQUIRED_PATIENT_FIELDS: &[&str] = &["name"];

/// Payload key naming a record's owner. Clients may never set it.
pub const OWNER_KEY: &str = "owner";

/// Keys managed by the store. Payloads carrying them are rejected.
pub const SERVER_MANAGED_KEYS: &[&str] = &["id", "_id", "owner", "createdAt", "updatedAt"];
