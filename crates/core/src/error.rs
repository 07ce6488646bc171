/// Errors raised by the intake core.
///
/// Variants map onto the failure taxonomy the API surfaces: invalid input
/// (4xx), a missing patient at schedule time (404), a failed triage
/// integration (502), and per-operation store failures (5xx). All of them
/// are local to one request; none crash the process.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("triage integration failed: {0}")]
    Integration(#[from] triage_client::TriageError),

    #[error("failed to create record directory: {0}")]
    RecordDirCreation(std::io::Error),
    #[error("failed to write record file: {0}")]
    RecordWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    RecordRead(std::io::Error),
    #[error("failed to scan record store: {0}")]
    StoreScan(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
