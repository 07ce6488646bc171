use reqwest::StatusCode;

/// Failures from the triage integration.
///
/// A triage call either succeeds with a payload or fails with one of
/// these; there is no in-between where a failure is silently carried as a
/// result.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid triage configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to initialise triage HTTP client: {0}")]
    Initialisation(reqwest::Error),
    #[error("triage request failed: {0}")]
    Transport(reqwest::Error),
    #[error("triage service returned status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("triage service returned an unusable payload: {0}")]
    InvalidPayload(reqwest::Error),
}
