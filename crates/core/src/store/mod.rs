//! Persistence traits and their implementations.
//!
//! Each method is one atomic call against the store. Nothing here spans several calls, so
//! the fetch a service does for its ownership check and the write that follows are two
//! separate operations.

pub mod file;
pub mod memory;

use crate::error::VaultResult;
use crate::ids::{PatientId, UserId};
use crate::patient::{NewPatient, Patient};
use crate::user::{NewUser, TokenDigest, User};
use async_trait::async_trait;
use serde_json::{Map, Value};

#[async_trait]
pub trait PatientStore: Send + Sync {
    /// All patients whose `owner` is `owner`, oldest first.
    async fn find_patients_by_owner(&self, owner: UserId) -> VaultResult<Vec<Patient>>;

    async fn find_patient(&self, id: PatientId) -> VaultResult<Option<Patient>>;

    /// Validates and persists a new patient, assigning its id and timestamps.
    async fn create_patient(&self, new: NewPatient) -> VaultResult<Patient>;

    /// Validates and applies a partial update.
    async fn update_patient(&self, id: PatientId, changes: Map<String, Value>) -> VaultResult<()>;

    async fn delete_patient(&self, id: PatientId) -> VaultResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: UserId) -> VaultResult<Option<User>>;

    async fn find_user_by_token_digest(&self, digest: &TokenDigest) -> VaultResult<Option<User>>;

    async fn list_users(&self) -> VaultResult<Vec<User>>;

    /// Stores a new user. Emails are unique.
    async fn insert_user(&self, new: NewUser) -> VaultResult<User>;
}
