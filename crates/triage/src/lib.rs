//! # Triage Client
//!
//! Outbound adapter for the external symptom-triage service.
//!
//! Translates an ordered symptom list plus a demographic context into a
//! single HTTP round trip against the triage endpoint and back into a
//! [`TriageResult`]. The diagnosis payload is carried verbatim; this
//! crate never interprets it beyond checking that the service produced
//! one.
//!
//! Failure is always explicit: transport errors, non-success statuses and
//! unusable payloads each surface as a distinct [`TriageError`] variant so
//! callers can refuse to treat a failed call as a diagnosis.

#![warn(rust_2018_idioms)]

pub mod client;
pub mod config;
pub mod error;

pub use client::{TriageApi, TriageClient, TriageResult};
pub use config::{DemographicContext, TriageConfig};
pub use error::TriageError;
