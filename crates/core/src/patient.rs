//! Patient records and the schema rules stores apply to them.

use crate::access::Owned;
use crate::constants::SERVER_MANAGED_KEYS;
use crate::error::{VaultError, VaultResult};
use crate::ids::{PatientId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored patient.
///
/// Serializes flat: `{ "id", "owner", "createdAt", "updatedAt", ...attributes }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Owned for Patient {
    const RESOURCE: &'static str = "patient";

    fn owner(&self) -> &UserId {
        &self.owner
    }
}

impl Patient {
    /// Applies a partial update: each key in `changes` replaces the attribute of the same name.
    pub(crate) fn apply(&mut self, changes: Map<String, Value>, now: DateTime<Utc>) {
        for (key, value) in changes {
            self.attributes.insert(key, value);
        }
        self.updated_at = now;
    }
}

/// A patient about to be created. The owner is fixed here and never taken from the payload.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPatient {
    pub owner: UserId,
    pub attributes: Map<String, Value>,
}

impl NewPatient {
    pub(crate) fn into_patient(self, id: PatientId, now: DateTime<Utc>) -> Patient {
        Patient {
            id,
            owner: self.owner,
            created_at: now,
            updated_at: now,
            attributes: self.attributes,
        }
    }
}

/// Field rules for patient payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientSchema {
    required: Vec<String>,
}

impl PatientSchema {
    pub fn new(required: Vec<String>) -> Self {
        Self { required }
    }

    /// Checks the attributes of a patient about to be created.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` if a server-managed key is present, or a required
    /// attribute is missing, null or an empty string.
    pub fn validate_new(&self, attributes: &Map<String, Value>) -> VaultResult<()> {
        reject_server_managed(attributes)?;
        for field in &self.required {
            match attributes.get(field) {
                Some(value) if !is_unset(value) => {}
                _ => return Err(VaultError::Validation(format!("`{field}` is required"))),
            }
        }
        Ok(())
    }

    /// Checks a partial update.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` if a server-managed key is present or a required
    /// attribute would be set to null or an empty string.
    pub fn validate_changes(&self, changes: &Map<String, Value>) -> VaultResult<()> {
        reject_server_managed(changes)?;
        for field in &self.required {
            if changes.get(field).is_some_and(is_unset) {
                return Err(VaultError::Validation(format!(
                    "`{field}` is required and cannot be cleared"
                )));
            }
        }
        Ok(())
    }
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn reject_server_managed(attributes: &Map<String, Value>) -> VaultResult<()> {
    match SERVER_MANAGED_KEYS
        .iter()
        .find(|key| attributes.contains_key(**key))
    {
        Some(key) => Err(VaultError::Validation(format!(
            "`{key}` is assigned by the server"
        ))),
        None => Ok(()),
    }
}
