//! Triage client configuration.
//!
//! Configuration is resolved once at process startup and passed into the
//! client at construction. Nothing in this crate reads environment
//! variables during request handling, and the demographic context sent
//! with each request comes from the caller; the configured context is
//! only a fallback for callers that have none.

use crate::error::TriageError;
use std::time::Duration;

/// Demographic context attached to a triage request.
///
/// The triage service expects an age and a sex field; the sex value is
/// derived from the caller-supplied gender text, lowercased, and otherwise
/// passed through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemographicContext {
    age: u32,
    sex: String,
}

impl DemographicContext {
    /// Builds a context from a patient's age and reported gender.
    pub fn new(age: u32, gender: &str) -> Self {
        Self {
            age,
            sex: gender.trim().to_lowercase(),
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn sex(&self) -> &str {
        &self.sex
    }
}

/// Connection settings for the external triage service.
///
/// Carries the endpoint, the two caller-identifying credentials sent as
/// headers with every request, the per-request timeout, and the fallback
/// demographic context.
#[derive(Clone, Debug)]
pub struct TriageConfig {
    endpoint: String,
    app_id: String,
    app_key: String,
    timeout: Duration,
    default_context: DemographicContext,
}

impl TriageConfig {
    /// Creates a new `TriageConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidConfig`] if the endpoint is not an
    /// http(s) URL or either credential is empty.
    pub fn new(
        endpoint: String,
        app_id: String,
        app_key: String,
        timeout: Duration,
        default_context: DemographicContext,
    ) -> Result<Self, TriageError> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(TriageError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got: '{endpoint}'"
            )));
        }
        if app_id.trim().is_empty() || app_key.trim().is_empty() {
            return Err(TriageError::InvalidConfig(
                "app_id and app_key credentials cannot be empty".into(),
            ));
        }

        Ok(Self {
            endpoint,
            app_id,
            app_key,
            timeout,
            default_context,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_context(&self) -> &DemographicContext {
        &self.default_context
    }

    /// Resolves the context for one request: the caller's own context when
    /// supplied, otherwise the configured fallback.
    pub fn context_or_default<'a>(
        &'a self,
        context: Option<&'a DemographicContext>,
    ) -> &'a DemographicContext {
        context.unwrap_or(&self.default_context)
    }
}
