//! The five patient operations.
//!
//! Every operation takes the already-authenticated [`Principal`]. Single-record operations fetch
//! the record, run it through [`ensure_found`] and [`require_ownership`], and only then expose or
//! mutate it. The service does no local recovery: every failure is returned to the caller as is.

use crate::access::{ensure_found, require_ownership, Principal};
use crate::error::VaultResult;
use crate::ids::PatientId;
use crate::patient::{NewPatient, Patient};
use crate::sanitize::without_owner;
use crate::store::PatientStore;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Every patient owned by `principal`.
    pub async fn list(&self, principal: &Principal) -> VaultResult<Vec<Patient>> {
        self.store.find_patients_by_owner(principal.user_id()).await
    }

    pub async fn get(&self, principal: &Principal, id: &str) -> VaultResult<Patient> {
        self.fetch_owned(principal, id).await
    }

    /// Creates a patient owned by `principal`, whatever `owner` the payload claims.
    pub async fn create(
        &self,
        principal: &Principal,
        attributes: Map<String, Value>,
    ) -> VaultResult<Patient> {
        let new = NewPatient {
            owner: principal.user_id(),
            attributes: without_owner(attributes),
        };
        let patient = self.store.create_patient(new).await?;
        tracing::info!("patient {} created by {}", patient.id, patient.owner);
        Ok(patient)
    }

    /// Applies a partial update. Any `owner` key in `changes` is discarded first.
    ///
    /// An update with nothing left to change succeeds without writing.
    pub async fn update(
        &self,
        principal: &Principal,
        id: &str,
        changes: Map<String, Value>,
    ) -> VaultResult<()> {
        let changes = without_owner(changes);
        let patient = self.fetch_owned(principal, id).await?;
        if changes.is_empty() {
            return Ok(());
        }
        self.store.update_patient(patient.id, changes).await?;
        tracing::info!("patient {} updated by {}", patient.id, principal.user_id());
        Ok(())
    }

    pub async fn delete(&self, principal: &Principal, id: &str) -> VaultResult<()> {
        let patient = self.fetch_owned(principal, id).await?;
        self.store.delete_patient(patient.id).await?;
        tracing::info!("patient {} deleted by {}", patient.id, principal.user_id());
        Ok(())
    }

    /// Looks `id` up and applies the existence then ownership checks.
    ///
    /// An id that is not even well formed cannot name a stored record, so it is reported as
    /// not found rather than as a malformed request.
    async fn fetch_owned(&self, principal: &Principal, id: &str) -> VaultResult<Patient> {
        let record = match PatientId::parse(id) {
            Ok(patient_id) => self.store.find_patient(patient_id).await?,
            Err(_) => None,
        };
        let patient = ensure_found(record, id)?;
        require_ownership(principal, &patient)?;
        Ok(patient)
    }
}
