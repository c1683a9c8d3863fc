//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into stores and services. Request
//! handling never reads environment variables.

use crate::constants::{
    DEFAULT_REQUIRED_PATIENT_FIELDS, PATIENTS_DIR_NAME, SERVER_MANAGED_KEYS, USERS_DIR_NAME,
};
use crate::patient::PatientSchema;
use crate::{VaultError, VaultResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    required_patient_fields: Vec<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if a required field name is blank or names a
    /// server-managed key.
    pub fn new(data_dir: PathBuf, required_patient_fields: Vec<String>) -> VaultResult<Self> {
        for field in &required_patient_fields {
            if field.trim().is_empty() {
                return Err(VaultError::InvalidInput(
                    "required patient field names cannot be empty".into(),
                ));
            }
            if SERVER_MANAGED_KEYS.contains(&field.as_str()) {
                return Err(VaultError::InvalidInput(format!(
                    "`{field}` is server-managed and cannot be a required patient field"
                )));
            }
        }

        Ok(Self {
            data_dir,
            required_patient_fields,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn patients_dir(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_DIR_NAME)
    }

    pub fn users_dir(&self) -> PathBuf {
        self.data_dir.join(USERS_DIR_NAME)
    }

    pub fn required_patient_fields(&self) -> &[String] {
        &self.required_patient_fields
    }

    pub fn patient_schema(&self) -> PatientSchema {
        PatientSchema::new(self.required_patient_fields.clone())
    }
}

/// Parse the required patient fields from an optional comma-separated value.
///
/// `None` yields the defaults. A present but blank value means "no required fields".
pub fn required_fields_from_env_value(value: Option<String>) -> Vec<String> {
    match value {
        None => DEFAULT_REQUIRED_PATIENT_FIELDS
            .iter()
            .map(|f| f.to_string())
            .collect(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}
