//! Patient record identifiers.
//!
//! A record id is the store-assigned unique identifier for a patient
//! record, distinct from the patient's name. The canonical textual form is
//! 32 lowercase hex characters without hyphens, and the same form drives
//! the sharded on-disk layout of the record store.

use crate::TypesError;
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Canonical patient record identifier (32 lowercase hex characters).
///
/// Once constructed, the contained identifier is guaranteed to be in
/// canonical form. Construct with [`RecordId::new`] when the store assigns
/// a fresh id, or [`RecordId::parse`] when accepting an identifier from
/// outside the core (an API request body, for example).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Allocates a fresh identifier for a new patient record.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// Hyphenated or uppercase UUID forms are not normalised; callers must
    /// supply the canonical representation the service itself hands out.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidRecordId`] if `input` is not 32
    /// lowercase hex characters.
    pub fn parse(input: &str) -> Result<Self, TypesError> {
        if !Self::is_canonical(input) {
            return Err(TypesError::InvalidRecordId(format!(
                "record id must be 32 lowercase hex characters, got: '{input}'"
            )));
        }
        let uuid = Uuid::parse_str(input)
            .map_err(|e| TypesError::InvalidRecordId(format!("'{input}': {e}")))?;
        Ok(Self(uuid))
    }

    /// Purely syntactic check for the canonical form.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are the first
    /// four hex characters of the id.
    ///
    /// The two shard levels keep any single directory from accumulating an
    /// unbounded number of record directories.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for RecordId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_canonical_ids() {
        let id = RecordId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 32);
        assert!(RecordId::is_canonical(&text));
    }

    #[test]
    fn parse_round_trips_display() {
        let id = RecordId::new();
        let reparsed = RecordId::parse(&id.to_string()).expect("canonical id");
        assert_eq!(id, reparsed);
    }

    #[test]
    fn rejects_non_canonical_forms() {
        // Hyphenated, uppercase, short, and non-hex inputs are all refused.
        for input in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400E29B41D4A716446655440000",
            "550e8400",
            "zz0e8400e29b41d4a716446655440000",
            "",
        ] {
            assert!(
                matches!(RecordId::parse(input), Err(TypesError::InvalidRecordId(_))),
                "should reject '{input}'"
            );
        }
    }

    #[test]
    fn sharded_dir_uses_leading_hex_pairs() {
        let id = RecordId::parse("abcd1234abcd1234abcd1234abcd1234").expect("canonical id");
        let dir = id.sharded_dir(Path::new("/data/records"));
        assert_eq!(
            dir,
            Path::new("/data/records/ab/cd/abcd1234abcd1234abcd1234abcd1234")
        );
    }

    #[test]
    fn serde_round_trip() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        let back: RecordId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, back);
    }
}
