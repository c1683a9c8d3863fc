//! Users: the principals that own patients.
//!
//! The hashed credential is held by [`User`] but can never be serialized from it.
//! [`HashedPassword`] has no `Serialize` implementation and the field is skipped by `User`'s
//! derive, so no response, log line or export built from a `User` can include it. Only the
//! stores' private document type writes it to disk.

use crate::ids::UserId;
use chrono::{DateTime, Utc};
use pvault_types::{EmailAddress, MobileNumber, NonEmptyText};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// An already-hashed password. Hashing and verification happen outside this workspace.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// SHA-256 digest (lowercase hex) of a bearer token.
///
/// Stores keep the digest rather than the token itself; the authentication gate hashes the
/// presented token and looks the digest up.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDigest(String);

impl TokenDigest {
    pub fn of(token: &str) -> Self {
        Self(hex::encode(Sha256::digest(token.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: NonEmptyText,
    pub national_id: NonEmptyText,
    pub mobile_number: MobileNumber,
    #[serde(skip_serializing)]
    hashed_password: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn hashed_password(&self) -> &HashedPassword {
        &self.hashed_password
    }
}

/// Everything needed to provision a user.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: EmailAddress,
    pub name: NonEmptyText,
    pub national_id: NonEmptyText,
    pub mobile_number: MobileNumber,
    pub hashed_password: HashedPassword,
    pub token_digest: Option<TokenDigest>,
}

/// On-disk (and in-memory) form of a user, including the credential material.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredUser {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: NonEmptyText,
    pub national_id: NonEmptyText,
    pub mobile_number: MobileNumber,
    pub hashed_password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_digest: Option<TokenDigest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn from_new(new: NewUser, id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: new.email,
            name: new.name,
            national_id: new.national_id,
            mobile_number: new.mobile_number,
            hashed_password: new.hashed_password.expose().to_owned(),
            token_digest: new.token_digest,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches_token(&self, digest: &TokenDigest) -> bool {
        self.token_digest.as_ref() == Some(digest)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            national_id: self.national_id.clone(),
            mobile_number: self.mobile_number.clone(),
            hashed_password: HashedPassword::new(self.hashed_password.clone()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn new_user(email: &str, token: Option<&str>) -> NewUser {
        NewUser {
            email: EmailAddress::parse(email).unwrap(),
            name: NonEmptyText::new("Ada Lovelace").unwrap(),
            national_id: NonEmptyText::new("AB123456C").unwrap(),
            mobile_number: MobileNumber::parse("07700900123").unwrap(),
            hashed_password: HashedPassword::new("$2b$10$abcdefghijklmnopqrstuv"),
            token_digest: token.map(TokenDigest::of),
        }
    }

    #[test]
    fn serialized_user_never_contains_the_hashed_password() {
        let stored = StoredUser::from_new(new_user("ada@example.com", None), UserId::new(), Utc::now());
        let user = stored.to_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashedPassword"));
        assert!(!json.contains("$2b$10$"));

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["nationalId"], "AB123456C");
        assert_eq!(value["mobileNumber"], "07700900123");

        let debug = format!("{user:?}");
        assert!(!debug.contains("$2b$10$"));
        assert_eq!(user.hashed_password().expose(), "$2b$10$abcdefghijklmnopqrstuv");
    }

    #[test]
    fn token_digest_is_sha256_hex() {
        let digest = TokenDigest::of("abc");
        assert_eq!(
            digest.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn stored_user_matches_only_its_token() {
        let stored = StoredUser::from_new(new_user("ada@example.com", Some("t0k")), UserId::new(), Utc::now());
        assert!(stored.matches_token(&TokenDigest::of("t0k")));
        assert!(!stored.matches_token(&TokenDigest::of("other")));
    }
}
