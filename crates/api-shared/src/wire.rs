//! REST wire types.
//!
//! Request and response bodies for the intake service's HTTP surface.
//! The triage payload travels as raw JSON: it is opaque to this system
//! and is returned to the caller exactly as the triage service produced
//! it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body for `POST /analyze`.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct AnalyzeReq {
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Ordered symptom identifiers; may be empty.
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// Response for a completed intake.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct AnalyzeRes {
    pub message: String,
    /// Record identifier to use for follow-up scheduling.
    pub patient_id: String,
    /// The diagnosis payload, verbatim from the triage service.
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Body for `POST /schedule`.
///
/// `patient_id` (handed out at intake) is the supported reference;
/// `name` remains as a deprecated convenience lookup.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct ScheduleReq {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Calendar date in `YYYY-MM-DD` form.
    pub appointment_date: String,
}

/// Response for a scheduled appointment.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ScheduleRes {
    pub message: String,
}

/// Body for `POST /reminder`.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct ReminderReq {
    pub name: String,
    pub medication: String,
    pub time: String,
}

/// Response for a dispatched reminder.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ReminderRes {
    pub message: String,
}

/// Structured error payload.
///
/// `step` identifies the failing stage of the request
/// (`validation`, `lookup`, `triage`, `store`) when one applies.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

/// Health check response.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_req_defaults_to_no_symptoms() {
        let req: AnalyzeReq =
            serde_json::from_str(r#"{"name":"Alice","age":34,"gender":"female"}"#)
                .expect("valid body");
        assert!(req.symptoms.is_empty());
    }

    #[test]
    fn analyze_req_rejects_negative_age() {
        let err = serde_json::from_str::<AnalyzeReq>(
            r#"{"name":"Alice","age":-1,"gender":"female","symptoms":[]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn error_res_omits_step_when_absent() {
        let body = ErrorRes {
            error: "Not found".into(),
            step: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Not found"}"#
        );
    }
}
