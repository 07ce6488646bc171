//! Ordered symptom identifier lists.
//!
//! Symptoms are reported as an ordered sequence of identifiers. In flight
//! they travel as a JSON array; at rest they are persisted as a single
//! `", "`-delimited string on the patient record. The list may be empty:
//! an intake with no reported symptoms is accepted, not rejected.

use serde::{Deserialize, Serialize};

/// Delimiter used for the persisted form of a symptom list.
pub const SYMPTOM_DELIMITER: &str = ", ";

/// An ordered sequence of symptom identifiers.
///
/// Order is preserved exactly as reported; no deduplication or
/// normalisation is applied to the identifiers themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomList(Vec<String>);

impl SymptomList {
    /// Wraps an ordered list of symptom identifiers.
    pub fn new(ids: Vec<String>) -> Self {
        Self(ids)
    }

    /// Reconstructs a list from its persisted delimited form.
    ///
    /// An empty string yields an empty list.
    pub fn from_joined(joined: &str) -> Self {
        if joined.is_empty() {
            return Self(Vec::new());
        }
        Self(
            joined
                .split(SYMPTOM_DELIMITER)
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Returns the persisted form: identifiers joined with `", "`.
    pub fn joined(&self) -> String {
        self.0.join(SYMPTOM_DELIMITER)
    }

    /// Returns the identifiers in reported order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for SymptomList {
    fn from(ids: Vec<String>) -> Self {
        Self::new(ids)
    }
}

impl<'a> IntoIterator for &'a SymptomList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> SymptomList {
        SymptomList::new(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn joins_in_reported_order() {
        assert_eq!(list(&["cough", "fever"]).joined(), "cough, fever");
        assert_eq!(list(&["fever", "cough"]).joined(), "fever, cough");
    }

    #[test]
    fn empty_list_persists_as_empty_string() {
        let empty = SymptomList::default();
        assert!(empty.is_empty());
        assert_eq!(empty.joined(), "");
        assert_eq!(SymptomList::from_joined(""), empty);
    }

    #[test]
    fn from_joined_restores_the_sequence() {
        let restored = SymptomList::from_joined("cough, fever, headache");
        assert_eq!(restored, list(&["cough", "fever", "headache"]));
    }

    #[test]
    fn deserializes_from_a_json_array() {
        let parsed: SymptomList =
            serde_json::from_str(r#"["cough","fever"]"#).expect("valid array");
        assert_eq!(parsed, list(&["cough", "fever"]));
    }
}
