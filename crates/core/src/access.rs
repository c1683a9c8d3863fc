//! Existence and ownership checks.
//!
//! Every operation on a single record runs the fetched value through [`ensure_found`] and then
//! [`require_ownership`], in that order, before anything is mutated or returned. A caller asking
//! for an id that does not exist therefore never reaches the ownership check, and a caller who
//! is not the owner only ever learns "forbidden".

use crate::error::{VaultError, VaultResult};
use crate::ids::UserId;
use std::fmt::Display;

/// The authenticated caller, as resolved by the authentication gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
}

impl Principal {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// A record that belongs to exactly one user.
pub trait Owned {
    /// Human-readable resource name used in error messages.
    const RESOURCE: &'static str;

    fn owner(&self) -> &UserId;
}

/// Passes a looked-up record through, or fails with `NotFound` if the lookup came back empty.
pub fn ensure_found<T: Owned>(record: Option<T>, id: impl Display) -> VaultResult<T> {
    record.ok_or_else(|| VaultError::not_found(T::RESOURCE, id))
}

/// Fails with `Forbidden` unless `principal` owns `record`.
pub fn require_ownership<T: Owned>(principal: &Principal, record: &T) -> VaultResult<()> {
    if record.owner() == &principal.user_id {
        Ok(())
    } else {
        Err(VaultError::Forbidden {
            resource: T::RESOURCE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[derive(Debug)]
    struct Note {
        owner: UserId,
    }

    impl Owned for Note {
        const RESOURCE: &'static str = "note";

        fn owner(&self) -> &UserId {
            &self.owner
        }
    }

    #[test]
    fn ensure_found_passes_records_through() {
        let owner = UserId::new();
        let note = ensure_found(Some(Note { owner }), "id").unwrap();
        assert_eq!(note.owner, owner);
    }

    #[test]
    fn ensure_found_reports_the_missing_id() {
        let err = ensure_found::<Note>(None, "abc123").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "no note matches id abc123");
    }

    #[test]
    fn owner_passes_ownership_check() {
        let owner = UserId::new();
        let note = Note { owner };
        assert!(require_ownership(&Principal::new(owner), &note).is_ok());
    }

    #[test]
    fn other_users_are_forbidden() {
        let note = Note {
            owner: UserId::new(),
        };
        let err = require_ownership(&Principal::new(UserId::new()), &note).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}
