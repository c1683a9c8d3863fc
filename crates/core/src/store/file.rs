//! Sharded JSON document store.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//!   patients/
//!     <s1>/<s2>/<uuid>.json
//!   users/
//!     <s1>/<s2>/<uuid>.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the record id.
//!
//! Documents are written to a temporary sibling and renamed into place, so readers never see a
//! half-written file. Mutations are serialised through a single lock; reads take no lock.
//! Owner and token lookups scan the relevant directory.

use super::{PatientStore, UserStore};
use crate::config::CoreConfig;
use crate::constants::DOCUMENT_EXTENSION;
use crate::error::{VaultError, VaultResult};
use crate::ids::{PatientId, UserId};
use crate::patient::{NewPatient, Patient, PatientSchema};
use crate::user::{NewUser, StoredUser, TokenDigest, User};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

const MAX_ID_ATTEMPTS: usize = 5;

#[derive(Debug)]
pub struct FileStore {
    patients_dir: PathBuf,
    users_dir: PathBuf,
    schema: PatientSchema,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens (and if necessary creates) the store under `cfg.data_dir()`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::StorageDirCreation` if the document directories cannot be created.
    pub async fn open(cfg: &CoreConfig) -> VaultResult<Self> {
        let patients_dir = cfg.patients_dir();
        let users_dir = cfg.users_dir();
        for dir in [&patients_dir, &users_dir] {
            fs::create_dir_all(dir)
                .await
                .map_err(VaultError::StorageDirCreation)?;
        }

        tracing::debug!("opened file store at {}", cfg.data_dir().display());

        Ok(Self {
            patients_dir,
            users_dir,
            schema: cfg.patient_schema(),
            write_lock: Mutex::new(()),
        })
    }

    async fn unused_patient_id(&self) -> VaultResult<PatientId> {
        for _attempt in 0..MAX_ID_ATTEMPTS {
            let id = PatientId::new();
            if !path_exists(&id.document_path(&self.patients_dir)).await? {
                return Ok(id);
            }
        }
        Err(VaultError::FileWrite(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "failed to allocate a unique patient id after 5 attempts",
        )))
    }
}

#[async_trait]
impl PatientStore for FileStore {
    async fn find_patients_by_owner(&self, owner: UserId) -> VaultResult<Vec<Patient>> {
        let mut owned: Vec<Patient> = scan_documents::<Patient>(&self.patients_dir)
            .await?
            .into_iter()
            .filter(|p| p.owner == owner)
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn find_patient(&self, id: PatientId) -> VaultResult<Option<Patient>> {
        read_document(&id.document_path(&self.patients_dir)).await
    }

    async fn create_patient(&self, new: NewPatient) -> VaultResult<Patient> {
        self.schema.validate_new(&new.attributes)?;

        let _guard = self.write_lock.lock().await;
        let id = self.unused_patient_id().await?;
        let patient = new.into_patient(id, Utc::now());
        write_document(&id.document_path(&self.patients_dir), &patient).await?;

        tracing::info!("stored patient {}", patient.id);
        Ok(patient)
    }

    async fn update_patient(&self, id: PatientId, changes: Map<String, Value>) -> VaultResult<()> {
        self.schema.validate_changes(&changes)?;

        let _guard = self.write_lock.lock().await;
        let path = id.document_path(&self.patients_dir);
        let mut patient: Patient = read_document(&path)
            .await?
            .ok_or_else(|| VaultError::not_found("patient", id))?;
        patient.apply(changes, Utc::now());
        write_document(&path, &patient).await
    }

    async fn delete_patient(&self, id: PatientId) -> VaultResult<()> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(id.document_path(&self.patients_dir)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(VaultError::not_found("patient", id)),
            Err(e) => Err(VaultError::FileDelete(e)),
        }
    }
}

#[async_trait]
impl UserStore for FileStore {
    async fn find_user(&self, id: UserId) -> VaultResult<Option<User>> {
        let stored: Option<StoredUser> = read_document(&id.document_path(&self.users_dir)).await?;
        Ok(stored.as_ref().map(StoredUser::to_user))
    }

    async fn find_user_by_token_digest(&self, digest: &TokenDigest) -> VaultResult<Option<User>> {
        Ok(scan_documents::<StoredUser>(&self.users_dir)
            .await?
            .iter()
            .find(|u| u.matches_token(digest))
            .map(StoredUser::to_user))
    }

    async fn list_users(&self) -> VaultResult<Vec<User>> {
        let mut users: Vec<User> = scan_documents::<StoredUser>(&self.users_dir)
            .await?
            .iter()
            .map(StoredUser::to_user)
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn insert_user(&self, new: NewUser) -> VaultResult<User> {
        let _guard = self.write_lock.lock().await;
        let existing = scan_documents::<StoredUser>(&self.users_dir).await?;
        if existing.iter().any(|u| u.email == new.email) {
            return Err(VaultError::DuplicateEmail(new.email.to_string()));
        }

        let stored = StoredUser::from_new(new, UserId::new(), Utc::now());
        write_document(&stored.id.document_path(&self.users_dir), &stored).await?;

        tracing::info!("stored user {}", stored.id);
        Ok(stored.to_user())
    }
}

async fn path_exists(path: &Path) -> VaultResult<bool> {
    fs::try_exists(path).await.map_err(VaultError::FileRead)
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> VaultResult<Option<T>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(VaultError::FileRead(e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(VaultError::Deserialization)
}

async fn write_document<T: Serialize>(path: &Path, document: &T) -> VaultResult<()> {
    let bytes = serde_json::to_vec_pretty(document).map_err(VaultError::Serialization)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(VaultError::StorageDirCreation)?;
    }

    let tmp = path.with_extension(format!("{DOCUMENT_EXTENSION}.tmp"));
    fs::write(&tmp, bytes).await.map_err(VaultError::FileWrite)?;
    fs::rename(&tmp, path).await.map_err(VaultError::FileWrite)
}

/// Reads every document under `<dir>/<s1>/<s2>/`.
///
/// Unreadable or unparsable documents are logged and skipped so one bad file cannot take a
/// whole listing down.
async fn scan_documents<T: DeserializeOwned>(dir: &Path) -> VaultResult<Vec<T>> {
    let mut documents = Vec::new();

    for s1 in subdirectories(dir).await? {
        for s2 in subdirectories(&s1).await? {
            let mut entries = fs::read_dir(&s2).await.map_err(VaultError::FileRead)?;
            while let Some(entry) = entries.next_entry().await.map_err(VaultError::FileRead)? {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                    continue;
                }

                match read_document::<T>(&path).await {
                    Ok(Some(doc)) => documents.push(doc),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
                }
            }
        }
    }

    Ok(documents)
}

async fn subdirectories(dir: &Path) -> VaultResult<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(VaultError::FileRead(e)),
    };

    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(VaultError::FileRead)? {
        if entry
            .file_type()
            .await
            .map_err(VaultError::FileRead)?
            .is_dir()
        {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::tests::new_user;
    use crate::ErrorKind as VaultErrorKind;
    use serde_json::json;
    use tempfile::TempDir;

    async fn open(temp_dir: &TempDir) -> FileStore {
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf(), vec!["name".into()])
            .expect("CoreConfig::new should succeed");
        FileStore::open(&cfg).await.expect("open should succeed")
    }

    fn new_patient(owner: UserId, attributes: Value) -> NewPatient {
        NewPatient {
            owner,
            attributes: attributes.as_object().cloned().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_writes_sharded_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open(&temp_dir).await;

        let patient = store
            .create_patient(new_patient(UserId::new(), json!({ "name": "Ada" })))
            .await
            .unwrap();

        let id = patient.id.to_string();
        let path = temp_dir
            .path()
            .join("patients")
            .join(&id[0..2])
            .join(&id[2..4])
            .join(format!("{id}.json"));
        assert!(path.is_file());

        let found = store.find_patient(patient.id).await.unwrap();
        assert_eq!(found, Some(patient));
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open(&temp_dir).await;
        let patient = store
            .create_patient(new_patient(UserId::new(), json!({ "name": "Ada", "ward": "B" })))
            .await
            .unwrap();

        let changes = json!({ "ward": "C" }).as_object().cloned().unwrap();
        store.update_patient(patient.id, changes).await.unwrap();

        let reopened = open(&temp_dir).await;
        let updated = reopened.find_patient(patient.id).await.unwrap().unwrap();
        assert_eq!(updated.attributes["ward"], "C");
        assert_eq!(updated.attributes["name"], "Ada");
        assert_eq!(updated.owner, patient.owner);
        assert!(updated.updated_at >= patient.updated_at);
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open(&temp_dir).await;
        let patient = store
            .create_patient(new_patient(UserId::new(), json!({ "name": "Ada" })))
            .await
            .unwrap();

        store.delete_patient(patient.id).await.unwrap();
        assert!(store.find_patient(patient.id).await.unwrap().is_none());

        let err = store.delete_patient(patient.id).await.unwrap_err();
        assert_eq!(err.kind(), VaultErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_find_by_owner_skips_corrupt_documents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open(&temp_dir).await;
        let owner = UserId::new();
        store
            .create_patient(new_patient(owner, json!({ "name": "Ada" })))
            .await
            .unwrap();
        store
            .create_patient(new_patient(UserId::new(), json!({ "name": "Bob" })))
            .await
            .unwrap();

        let junk = temp_dir.path().join("patients").join("ff").join("ff");
        std::fs::create_dir_all(&junk).unwrap();
        std::fs::write(junk.join("ffffffffffffffffffffffffffffffff.json"), b"{ not json").unwrap();

        let owned = store.find_patients_by_owner(owner).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].attributes["name"], "Ada");
    }

    #[tokio::test]
    async fn test_user_document_keeps_credentials_but_user_hides_them() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open(&temp_dir).await;
        let user = store
            .insert_user(new_user("ada@example.com", Some("t0k")))
            .await
            .unwrap();

        let id = user.id.to_string();
        let raw = std::fs::read_to_string(
            temp_dir
                .path()
                .join("users")
                .join(&id[0..2])
                .join(&id[2..4])
                .join(format!("{id}.json")),
        )
        .unwrap();
        assert!(raw.contains("hashedPassword"));
        assert!(raw.contains(TokenDigest::of("t0k").as_str()));
        assert!(!raw.contains("\"t0k\""));

        let found = store
            .find_user_by_token_digest(&TokenDigest::of("t0k"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert!(!serde_json::to_string(&found).unwrap().contains("hashedPassword"));

        let err = store
            .insert_user(new_user("ada@example.com", None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), VaultErrorKind::ValidationFailed);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }
}
