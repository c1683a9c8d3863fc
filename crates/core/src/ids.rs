//! Typed record identifiers.
//!
//! `PatientId` and `UserId` share a representation but are distinct types, so an owner reference
//! can never be confused with the record it points at.

use pvault_uuid::{ShardableUuid, UuidResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::DOCUMENT_EXTENSION;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(ShardableUuid);

        impl $name {
            /// Allocates a fresh identifier.
            pub fn new() -> Self {
                Self(ShardableUuid::new())
            }

            /// Parses a canonical identifier.
            pub fn parse(input: &str) -> UuidResult<Self> {
                ShardableUuid::parse(input).map(Self)
            }

            pub(crate) fn document_path(&self, parent_dir: &Path) -> PathBuf {
                self.0.sharded_file(parent_dir, DOCUMENT_EXTENSION)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = pvault_uuid::UuidError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

record_id!(
    /// Identifier of a stored patient.
    PatientId
);

record_id!(
    /// Identifier of a user; also the value of a patient's `owner` field.
    UserId
);
