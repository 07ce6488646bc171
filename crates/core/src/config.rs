//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services. Nothing here reads process-wide environment variables
//! during request handling, which keeps behaviour consistent across
//! multi-threaded runtimes and test harnesses.

use crate::{IntakeError, IntakeResult};
use std::path::{Path, PathBuf};

/// Directory under the data dir that holds patient record shards.
pub const RECORDS_DIR_NAME: &str = "records";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    record_data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The directory itself is created lazily by the store on first
    /// write, but the configured path must not be empty.
    pub fn new(record_data_dir: PathBuf) -> IntakeResult<Self> {
        if record_data_dir.as_os_str().is_empty() {
            return Err(IntakeError::InvalidInput(
                "record_data_dir cannot be empty".into(),
            ));
        }

        Ok(Self { record_data_dir })
    }

    pub fn record_data_dir(&self) -> &Path {
        &self.record_data_dir
    }

    /// Root of the sharded record tree.
    pub fn records_dir(&self) -> PathBuf {
        self.record_data_dir.join(RECORDS_DIR_NAME)
    }
}
