//! Error types for core operations.
//!
//! Every failure a store, the access checks or the service can produce is a [`VaultError`].
//! Callers at a transport boundary should branch on [`VaultError::kind`] rather than on
//! individual variants.

/// The fixed set of failure categories a boundary handler has to map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No credential, or one that does not resolve to a user.
    Unauthorized,
    /// The requested record does not exist.
    NotFound,
    /// The record exists but belongs to someone else.
    Forbidden,
    /// The payload was rejected by the store's schema rules.
    ValidationFailed,
    /// Persistence failed for reasons unrelated to the request.
    StoreUnavailable,
}

impl ErrorKind {
    /// Stable snake_case name, suitable for machine-readable error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::ValidationFailed => "validation_failed",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("missing or invalid bearer credential")]
    Unauthorized,
    #[error("no {resource} matches id {id}")]
    NotFound { resource: &'static str, id: String },
    #[error("the requesting user does not own this {resource}")]
    Forbidden { resource: &'static str },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("a user with email {0} already exists")]
    DuplicateEmail(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete document: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document: {0}")]
    Deserialization(serde_json::Error),
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Validation(_) | Self::DuplicateEmail(_) | Self::InvalidInput(_) => {
                ErrorKind::ValidationFailed
            }
            Self::StorageDirCreation(_)
            | Self::FileWrite(_)
            | Self::FileRead(_)
            | Self::FileDelete(_)
            | Self::Serialization(_)
            | Self::Deserialization(_) => ErrorKind::StoreUnavailable,
        }
    }

    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<pvault_types::TextError> for VaultError {
    fn from(err: pvault_types::TextError) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type VaultResult<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_taxonomy() {
        assert_eq!(VaultError::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            VaultError::not_found("patient", "abc").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            VaultError::Forbidden {
                resource: "patient"
            }
            .kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(
            VaultError::DuplicateEmail("a@b.co".into()).kind(),
            ErrorKind::ValidationFailed
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert_eq!(VaultError::FileRead(io).kind(), ErrorKind::StoreUnavailable);
    }

    #[test]
    fn text_errors_become_validation_failures() {
        let err: VaultError = pvault_types::TextError::Empty.into();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }
}
