//! In-memory store, used by tests and local experiments.

use super::{PatientStore, UserStore};
use crate::error::{VaultError, VaultResult};
use crate::ids::{PatientId, UserId};
use crate::patient::{NewPatient, Patient, PatientSchema};
use crate::user::{NewUser, StoredUser, TokenDigest, User};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    schema: PatientSchema,
    patients: RwLock<HashMap<PatientId, Patient>>,
    users: RwLock<HashMap<UserId, StoredUser>>,
}

impl MemoryStore {
    pub fn new(schema: PatientSchema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn find_patients_by_owner(&self, owner: UserId) -> VaultResult<Vec<Patient>> {
        let patients = self.patients.read().await;
        let mut owned: Vec<Patient> = patients
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn find_patient(&self, id: PatientId) -> VaultResult<Option<Patient>> {
        Ok(self.patients.read().await.get(&id).cloned())
    }

    async fn create_patient(&self, new: NewPatient) -> VaultResult<Patient> {
        self.schema.validate_new(&new.attributes)?;
        let patient = new.into_patient(PatientId::new(), Utc::now());
        self.patients
            .write()
            .await
            .insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn update_patient(&self, id: PatientId, changes: Map<String, Value>) -> VaultResult<()> {
        self.schema.validate_changes(&changes)?;
        let mut patients = self.patients.write().await;
        let patient = patients
            .get_mut(&id)
            .ok_or_else(|| VaultError::not_found("patient", id))?;
        patient.apply(changes, Utc::now());
        Ok(())
    }

    async fn delete_patient(&self, id: PatientId) -> VaultResult<()> {
        self.patients
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| VaultError::not_found("patient", id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: UserId) -> VaultResult<Option<User>> {
        Ok(self.users.read().await.get(&id).map(StoredUser::to_user))
    }

    async fn find_user_by_token_digest(&self, digest: &TokenDigest) -> VaultResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.matches_token(digest))
            .map(StoredUser::to_user))
    }

    async fn list_users(&self) -> VaultResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().map(StoredUser::to_user).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn insert_user(&self, new: NewUser) -> VaultResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(VaultError::DuplicateEmail(new.email.to_string()));
        }
        let stored = StoredUser::from_new(new, UserId::new(), Utc::now());
        let user = stored.to_user();
        users.insert(stored.id, stored);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::tests::new_user;
    use crate::ErrorKind;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new(PatientSchema::new(vec!["name".into()]))
    }

    fn new_patient(owner: UserId, name: &str) -> NewPatient {
        NewPatient {
            owner,
            attributes: json!({ "name": name }).as_object().cloned().unwrap(),
        }
    }

    #[tokio::test]
    async fn find_by_owner_filters_other_owners() {
        let store = store();
        let alice = UserId::new();
        let bob = UserId::new();
        store.create_patient(new_patient(alice, "a1")).await.unwrap();
        store.create_patient(new_patient(bob, "b1")).await.unwrap();
        store.create_patient(new_patient(alice, "a2")).await.unwrap();

        let owned = store.find_patients_by_owner(alice).await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|p| p.owner == alice));
    }

    #[tokio::test]
    async fn create_enforces_schema() {
        let err = store()
            .create_patient(NewPatient {
                owner: UserId::new(),
                attributes: Map::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn update_and_delete_missing_patient_are_not_found() {
        let store = store();
        let id = PatientId::new();
        let err = store.update_patient(id, Map::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = store.delete_patient(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn users_are_found_by_token_digest() {
        let store = store();
        let user = store
            .insert_user(new_user("ada@example.com", Some("secret")))
            .await
            .unwrap();

        let found = store
            .find_user_by_token_digest(&TokenDigest::of("secret"))
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store
            .find_user_by_token_digest(&TokenDigest::of("wrong"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_emails_are_rejected() {
        let store = store();
        store.insert_user(new_user("ada@example.com", None)).await.unwrap();
        let err = store
            .insert_user(new_user("ADA@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::DuplicateEmail(_)));
    }
}
