use crate::{UuidError, UuidResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// A UUID known to be in canonical form.
///
/// Construct one with [`ShardableUuid::new`] when allocating a fresh record, or
/// [`ShardableUuid::parse`] when an identifier arrives from a request path, a CLI argument or a
/// stored document. `parse` does not normalise: hyphenated or uppercase input is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShardableUuid(Uuid);

impl Default for ShardableUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardableUuid {
    /// Allocates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates an identifier that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "UUID must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(e.to_string()))
    }

    /// Purely syntactic check for the canonical form.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>` where `s1`/`s2` are the first two pairs of hex digits.
    pub fn shard_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.to_string();
        let (s1, rest) = canonical.split_at(2);
        let (s2, _) = rest.split_at(2);
        parent_dir.join(s1).join(s2)
    }

    /// Returns the path of the document named after this identifier inside its shard.
    pub fn sharded_file(&self, parent_dir: &Path, extension: &str) -> PathBuf {
        self.shard_dir(parent_dir)
            .join(format!("{}.{}", self, extension))
    }
}

impl fmt::Display for ShardableUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for ShardableUuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ShardableUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ShardableUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "550e8400e29b41d4a716446655440000";

    #[test]
    fn test_new_generates_canonical_uuid() {
        let id = ShardableUuid::new();
        assert!(ShardableUuid::is_canonical(&id.to_string()));
    }

    #[test]
    fn test_parse_accepts_canonical() {
        let id = ShardableUuid::parse(CANONICAL).unwrap();
        assert_eq!(id.to_string(), CANONICAL);
    }

    #[test]
    fn test_parse_rejects_non_canonical_forms() {
        for input in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400E29B41D4A716446655440000",
            "550e8400e29b41d4a71644665544000",
            "550e8400e29b41d4a7164466554400000",
            "550e8400e29b41d4a716446655440zzz",
            "",
        ] {
            match ShardableUuid::parse(input) {
                Err(UuidError::InvalidInput(msg)) => {
                    assert!(msg.contains("32 lowercase hex characters"))
                }
                Ok(_) => panic!("accepted non-canonical input {input:?}"),
            }
        }
    }

    #[test]
    fn test_sharded_file_layout() {
        let id = ShardableUuid::parse(CANONICAL).unwrap();
        let path = id.sharded_file(Path::new("/data/patients"), "json");
        assert_eq!(
            path,
            PathBuf::from("/data/patients/55/0e/550e8400e29b41d4a716446655440000.json")
        );
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = ShardableUuid::parse(CANONICAL).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{CANONICAL}\""));
        let back: ShardableUuid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ShardableUuid>("\"ABC\"").is_err());
    }
}
