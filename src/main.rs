use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use anyhow::Context;
use api_shared::auth::{ApiKey, require_api_key};
use api_shared::{
    AnalyzeReq, AnalyzeRes, ErrorRes, HealthRes, HealthService, ReminderReq, ReminderRes,
    ScheduleReq, ScheduleRes,
};
use intake_core::{
    CoreConfig, IntakeError, IntakeRequest, IntakeService, PatientRef, RecordStore,
    ReminderDispatcher, SchedulingService,
};
use intake_types::{RecordId, SymptomList};
use triage_client::{DemographicContext, TriageApi, TriageClient, TriageConfig};

/// Application state shared across REST API handlers
///
/// Contains the services needed by the REST API endpoints: the intake
/// orchestrator, the scheduling service and the reminder dispatcher.
#[derive(Clone)]
struct AppState {
    intake: IntakeService,
    scheduling: SchedulingService,
    reminder: ReminderDispatcher,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze, schedule, reminder),
    components(schemas(
        AnalyzeReq,
        AnalyzeRes,
        ScheduleReq,
        ScheduleRes,
        ReminderReq,
        ReminderRes,
        ErrorRes,
        HealthRes
    ))
)]
struct ApiDoc;

/// Wrapper mapping core errors onto HTTP responses.
///
/// Every failure becomes a structured `{"error", "step"}` payload; store
/// failures are logged in full but surface with a generic message.
struct ApiError(IntakeError);

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, step, message) = match &self.0 {
            IntakeError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, "validation", self.0.to_string())
            }
            IntakeError::PatientNotFound(detail) => {
                tracing::info!("schedule lookup miss: {detail}");
                (
                    StatusCode::NOT_FOUND,
                    "lookup",
                    "Patient not found".to_string(),
                )
            }
            IntakeError::Integration(_) => {
                (StatusCode::BAD_GATEWAY, "triage", self.0.to_string())
            }
            _ => {
                tracing::error!("record store failure: {:?}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store",
                    "Record store failure".to_string(),
                )
            }
        };

        let body = Json(ErrorRes {
            error: message,
            step: Some(step.to_string()),
        });

        (status, body).into_response()
    }
}

/// Main entry point for the intake service
///
/// Starts the REST server and wires the triage client and record store
/// into the request-handling services. The three workflow endpoints
/// require the `x-api-key` header; the health endpoint and Swagger UI
/// are open.
///
/// # Environment Variables
/// - `INTAKE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `INTAKE_DATA_DIR`: Directory for patient record storage (default: "/intake_data")
/// - `TRIAGE_API_URL`: Diagnosis endpoint of the external triage service (required)
/// - `TRIAGE_APP_ID` / `TRIAGE_APP_KEY`: Triage service credentials (required)
/// - `TRIAGE_TIMEOUT_SECS`: Outbound call timeout (default: 10)
/// - `API_KEY`: Expected client API key for the workflow endpoints (required)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration or startup fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("INTAKE_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;
    let data_dir = std::env::var("INTAKE_DATA_DIR").unwrap_or_else(|_| "/intake_data".into());

    let triage_url = std::env::var("TRIAGE_API_URL").context("TRIAGE_API_URL must be set")?;
    let triage_app_id = std::env::var("TRIAGE_APP_ID").context("TRIAGE_APP_ID must be set")?;
    let triage_app_key = std::env::var("TRIAGE_APP_KEY").context("TRIAGE_APP_KEY must be set")?;
    let triage_timeout: u64 = std::env::var("TRIAGE_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".into())
        .parse()
        .context("TRIAGE_TIMEOUT_SECS must be a number of seconds")?;

    let api_key = ApiKey::new(std::env::var("API_KEY").context("API_KEY must be set")?);

    tracing::info!("++ Starting intake REST on {}", rest_addr);

    let core_config = Arc::new(CoreConfig::new(PathBuf::from(data_dir))?);
    let store = Arc::new(RecordStore::new(core_config));

    let triage_config = TriageConfig::new(
        triage_url,
        triage_app_id,
        triage_app_key,
        Duration::from_secs(triage_timeout),
        // Fallback only; intake always sends the patient's own context.
        DemographicContext::new(30, "male"),
    )?;
    let triage: Arc<dyn TriageApi> = Arc::new(TriageClient::new(triage_config)?);

    let state = AppState {
        intake: IntakeService::new(store.clone(), triage),
        scheduling: SchedulingService::new(store),
        reminder: ReminderDispatcher::new(),
    };

    let workflow_routes = Router::new()
        .route("/analyze", post(analyze))
        .route("/schedule", post(schedule))
        .route("/reminder", post(reminder))
        .route_layer(middleware::from_fn_with_state(api_key, require_api_key));

    let app = Router::new()
        .route("/health", get(health))
        .merge(workflow_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the intake service. Used for
/// monitoring and load balancer health checks; not behind the API-key
/// gate.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Diagnosis complete", body = AnalyzeRes),
        (status = 400, description = "Invalid submission", body = ErrorRes),
        (status = 401, description = "Missing or invalid API key", body = ErrorRes),
        (status = 502, description = "Triage integration failed", body = ErrorRes),
        (status = 500, description = "Record store failure", body = ErrorRes)
    )
)]
/// Submit a patient's symptoms for triage
///
/// Forwards the reported symptoms to the external triage service with the
/// patient's own demographics, persists a new patient record carrying the
/// diagnosis, and returns the diagnosis payload along with the record id
/// to use for follow-up scheduling.
///
/// A failed triage call aborts the intake: no record is created and the
/// response identifies the triage step as the failure.
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeReq>,
) -> Result<Json<AnalyzeRes>, ApiError> {
    let outcome = state
        .intake
        .intake(IntakeRequest {
            name: req.name,
            age: req.age,
            gender: req.gender,
            symptoms: SymptomList::new(req.symptoms),
        })
        .await?;

    Ok(Json(AnalyzeRes {
        message: "Diagnosis complete".into(),
        patient_id: outcome.record_id.to_string(),
        data: outcome.diagnosis.into_payload(),
    }))
}

#[utoipa::path(
    post,
    path = "/schedule",
    request_body = ScheduleReq,
    responses(
        (status = 200, description = "Appointment scheduled", body = ScheduleRes),
        (status = 400, description = "Invalid reference or date", body = ErrorRes),
        (status = 401, description = "Missing or invalid API key", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Record store failure", body = ErrorRes)
    )
)]
/// Schedule an appointment for an existing patient
///
/// Accepts the record id handed out at intake (preferred) or a patient
/// name (deprecated; duplicate names resolve to the earliest record).
/// Scheduling twice overwrites the prior date.
async fn schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleReq>,
) -> Result<Json<ScheduleRes>, ApiError> {
    let patient = match (&req.patient_id, &req.name) {
        (Some(id), _) => PatientRef::Id(
            RecordId::parse(id).map_err(|e| IntakeError::InvalidInput(e.to_string()))?,
        ),
        (None, Some(name)) => PatientRef::Name(name.clone()),
        (None, None) => {
            return Err(IntakeError::InvalidInput(
                "either patient_id or name is required".into(),
            )
            .into());
        }
    };

    state.scheduling.schedule(patient, &req.appointment_date)?;

    Ok(Json(ScheduleRes {
        message: "Appointment scheduled successfully".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/reminder",
    request_body = ReminderReq,
    responses(
        (status = 200, description = "Reminder dispatched", body = ReminderRes),
        (status = 401, description = "Missing or invalid API key", body = ErrorRes)
    )
)]
/// Set a medication reminder
///
/// Pure formatting: no lookup against the record store and no
/// persistence. Always succeeds for a well-formed body.
async fn reminder(
    State(state): State<AppState>,
    Json(req): Json<ReminderReq>,
) -> Json<ReminderRes> {
    let confirmation = state.reminder.dispatch(&req.name, &req.medication, &req.time);
    Json(ReminderRes {
        message: confirmation.message,
    })
}

/// Fallback for unmatched routes.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorRes {
            error: "Not found".into(),
            step: None,
        }),
    )
}
