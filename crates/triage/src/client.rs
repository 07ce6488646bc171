//! The triage HTTP client and its wire format.
//!
//! Each symptom identifier becomes one evidence entry tagged
//! `"present"`; the triage service's absent/unknown evidence states are
//! not used by this system. Every call is a fresh round trip with the
//! configured timeout; there is no retry and no caching.

use crate::config::{DemographicContext, TriageConfig};
use crate::error::TriageError;
use async_trait::async_trait;
use intake_types::SymptomList;
use serde::Serialize;
use tracing::{debug, warn};

/// Header carrying the application identifier credential.
const APP_ID_HEADER: &str = "App-Id";
/// Header carrying the application key credential.
const APP_KEY_HEADER: &str = "App-Key";
/// The only evidence state this system reports.
const CHOICE_PRESENT: &str = "present";

/// The diagnosis payload returned by the triage service.
///
/// Treated as an opaque blob: stored and returned verbatim, never parsed
/// or validated beyond having been produced by a successful call.
#[derive(Clone, Debug, PartialEq)]
pub struct TriageResult(serde_json::Value);

impl TriageResult {
    pub fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    /// Borrows the raw payload.
    pub fn payload(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the result, yielding the raw payload.
    pub fn into_payload(self) -> serde_json::Value {
        self.0
    }

    /// Serializes the payload to the text form persisted on a patient
    /// record.
    pub fn to_text(&self) -> String {
        self.0.to_string()
    }
}

/// Request body for the diagnosis endpoint.
#[derive(Debug, Serialize)]
struct DiagnosisRequest<'a> {
    age: AgeValue,
    sex: &'a str,
    evidence: Vec<Evidence<'a>>,
}

#[derive(Debug, Serialize)]
struct AgeValue {
    value: u32,
}

#[derive(Debug, Serialize)]
struct Evidence<'a> {
    id: &'a str,
    choice_id: &'a str,
}

fn build_request<'a>(
    context: &'a DemographicContext,
    symptoms: &'a SymptomList,
) -> DiagnosisRequest<'a> {
    DiagnosisRequest {
        age: AgeValue {
            value: context.age(),
        },
        sex: context.sex(),
        evidence: symptoms
            .iter()
            .map(|id| Evidence {
                id: id.as_str(),
                choice_id: CHOICE_PRESENT,
            })
            .collect(),
    }
}

/// Seam for the triage integration.
///
/// The orchestrator depends on this trait rather than the concrete client
/// so intake can be exercised without a live triage service.
#[async_trait]
pub trait TriageApi: Send + Sync {
    /// Submits one symptom list for analysis.
    ///
    /// `context` should carry the patient's own demographics; `None` falls
    /// back to the configured default context.
    ///
    /// # Errors
    ///
    /// Returns a [`TriageError`] when the call does not produce a usable
    /// payload: transport failure (including timeout), a non-success
    /// status, or a response body that is not JSON.
    async fn analyze(
        &self,
        context: Option<&DemographicContext>,
        symptoms: &SymptomList,
    ) -> Result<TriageResult, TriageError>;
}

/// HTTP client for the external triage service.
pub struct TriageClient {
    http: reqwest::Client,
    config: TriageConfig,
}

impl TriageClient {
    /// Builds a client from the given configuration.
    ///
    /// The configured timeout bounds every request made through this
    /// client.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Initialisation`] if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: TriageConfig) -> Result<Self, TriageError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(TriageError::Initialisation)?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl TriageApi for TriageClient {
    async fn analyze(
        &self,
        context: Option<&DemographicContext>,
        symptoms: &SymptomList,
    ) -> Result<TriageResult, TriageError> {
        let context = self.config.context_or_default(context);
        let body = build_request(context, symptoms);
        debug!(
            symptom_count = symptoms.len(),
            endpoint = self.config.endpoint(),
            "submitting triage request"
        );

        let response = self
            .http
            .post(self.config.endpoint())
            .header(APP_ID_HEADER, self.config.app_id())
            .header(APP_KEY_HEADER, self.config.app_key())
            .json(&body)
            .send()
            .await
            .map_err(TriageError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "triage service rejected the request");
            return Err(TriageError::UnexpectedStatus(status));
        }

        let payload = response
            .json::<serde_json::Value>()
            .await
            .map_err(TriageError::InvalidPayload)?;

        Ok(TriageResult::new(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn symptoms(ids: &[&str]) -> SymptomList {
        SymptomList::new(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn request_body_tags_every_symptom_present() {
        let context = DemographicContext::new(34, "female");
        let symptoms = symptoms(&["cough", "fever"]);
        let body = build_request(&context, &symptoms);
        let wire = serde_json::to_value(&body).expect("serializable body");

        assert_eq!(
            wire,
            json!({
                "age": {"value": 34},
                "sex": "female",
                "evidence": [
                    {"id": "cough", "choice_id": "present"},
                    {"id": "fever", "choice_id": "present"},
                ],
            })
        );
    }

    #[test]
    fn request_body_preserves_symptom_order() {
        let context = DemographicContext::new(50, "male");
        let symptoms = symptoms(&["fever", "cough", "headache"]);
        let body = build_request(&context, &symptoms);
        let ids: Vec<&str> = body.evidence.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["fever", "cough", "headache"]);
    }

    #[test]
    fn empty_symptom_list_yields_empty_evidence() {
        let context = DemographicContext::new(34, "female");
        let symptoms = SymptomList::default();
        let body = build_request(&context, &symptoms);
        assert!(body.evidence.is_empty());
    }

    #[test]
    fn result_text_is_the_verbatim_payload() {
        let payload = json!({"conditions": [{"id": "flu", "probability": 0.8}]});
        let result = TriageResult::new(payload.clone());

        assert_eq!(result.payload(), &payload);
        assert_eq!(result.to_text(), payload.to_string());
    }
}
