//! # Intake Types
//!
//! Validated domain primitives shared across the intake service crates:
//!
//! - [`NonEmptyText`]: required text fields that must carry content
//! - [`RecordId`]: canonical patient record identifiers with sharded
//!   storage path derivation
//! - [`SymptomList`]: an ordered list of symptom identifiers and its
//!   delimited persistence form
//!
//! These types validate at construction so the rest of the system can
//! assume their invariants hold.

pub mod record_id;
pub mod symptoms;

pub use record_id::RecordId;
pub use symptoms::SymptomList;

/// Errors produced when constructing validated primitives.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// The input text was empty or contained only whitespace.
    #[error("text cannot be empty")]
    EmptyText,
    /// The input was not a canonical record identifier.
    #[error("invalid record id: {0}")]
    InvalidRecordId(String),
}

/// A string that is guaranteed to contain at least one non-whitespace
/// character.
///
/// Input is trimmed on construction; an empty or whitespace-only input is
/// rejected. Use this for fields the system requires to be present, such
/// as a patient's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and wraps it, rejecting empty results.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::EmptyText`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyText);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<NonEmptyText> for String {
    fn from(text: NonEmptyText) -> Self {
        text.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}
