// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use fieldcheck::{BulkOutcome, DEFAULT_CONFLICT_RETRIES, DEFAULT_MAX_PHOTO_BYTES, EngineConfig};
use fieldcheck_api::{
    ApiError, AttendanceResponse, AttendanceView, AuditTimelineResponse, AuthenticatedActor,
    BulkDecisionRequest, CheckInRequest, CheckOutRequest, DecisionRequest, EngineContext,
    HoursQuery, HoursSummaryResponse, ListOfficesResponse, PendingApprovalsQuery,
    PendingApprovalsResponse, Role, SubmitReasonRequest, audit_timeline, check_in, check_out,
    decide, decide_bulk, get_attendance, get_pending_approvals, hours_summary, list_offices,
    submit_reason,
};
use fieldcheck_audit::Cause;
use fieldcheck_domain::{Office, OfficeId};
use fieldcheck_persistence::Persistence;
use live::{LiveEventBroadcaster, live_events_handler};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info};

/// `FieldCheck` Server - HTTP server for the attendance approval engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// IANA timezone that defines calendar-day boundaries
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// JSON file of offices to load at startup
    #[arg(long)]
    offices: Option<String>,

    /// Largest accepted photo payload, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_PHOTO_BYTES)]
    max_photo_bytes: usize,

    /// Re-read attempts after a concurrent modification
    #[arg(long, default_value_t = DEFAULT_CONFLICT_RETRIES)]
    conflict_retries: u32,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, serialized behind a mutex.
    persistence: Arc<Mutex<Persistence>>,
    /// Receives committed transitions and fans them out to `/live` clients.
    broadcaster: Arc<LiveEventBroadcaster>,
    /// Deployment-wide engine settings.
    config: EngineConfig,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

/// A state-changing request: identity and cause plus the operation body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct WriteEnvelope<T> {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The operation itself.
    #[serde(flatten)]
    request: T,
}

impl<T> WriteEnvelope<T> {
    fn authenticate(&self) -> Result<AuthenticatedActor, HttpError> {
        authenticate(&self.actor_id, &self.actor_role)
    }

    fn cause(&self) -> Cause {
        Cause::new(self.cause_id.clone(), self.cause_description.clone())
    }
}

/// Identity for read requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorQuery {
    actor_id: String,
    actor_role: String,
}

/// Query for GET `/approvals/pending`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct PendingQuery {
    actor_id: String,
    actor_role: String,
    office_id: Option<String>,
    supervisor_id: Option<String>,
}

/// Query for GET `/officers/{id}/hours`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct HoursApiQuery {
    actor_id: String,
    actor_role: String,
    from: String,
    to: String,
}

/// One entry of the offices seed file.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct OfficeSeed {
    office_id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    supervisor_ids: Vec<String>,
}

const fn default_active() -> bool {
    true
}

impl OfficeSeed {
    fn into_office(self) -> Result<Office, fieldcheck_domain::DomainError> {
        Office::new(
            OfficeId::new(&self.office_id)?,
            self.name,
            (self.latitude, self.longitude),
            self.radius_m,
            self.is_active,
            self.supervisor_ids,
        )
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Stable error code.
    kind: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Stable error code.
    kind: String,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Resolves the caller's identity from the request.
fn authenticate(actor_id: &str, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = actor_role.parse().map_err(|e: fieldcheck_api::AuthError| HttpError {
        status: StatusCode::BAD_REQUEST,
        kind: String::from("InvalidRole"),
        message: e.to_string(),
    })?;
    if actor_id.trim().is_empty() {
        return Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            kind: String::from("InvalidIdentifier"),
            message: String::from("actor_id must not be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id.to_string(), role))
}

/// Handler for POST `/attendance/check_in`.
async fn handle_check_in(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteEnvelope<CheckInRequest>>,
) -> Result<Json<AttendanceResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        officer_id = %req.request.officer_id,
        office_id = %req.request.office_id,
        "Handling check_in request"
    );
    let actor: AuthenticatedActor = req.authenticate()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: AttendanceResponse = check_in(
        &mut persistence,
        EngineContext::new(&app_state.config, app_state.broadcaster.as_ref()),
        &req.request,
        &actor,
        &req.cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/attendance/check_out`.
async fn handle_check_out(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteEnvelope<CheckOutRequest>>,
) -> Result<Json<AttendanceResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        officer_id = %req.request.officer_id,
        "Handling check_out request"
    );
    let actor: AuthenticatedActor = req.authenticate()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: AttendanceResponse = check_out(
        &mut persistence,
        EngineContext::new(&app_state.config, app_state.broadcaster.as_ref()),
        &req.request,
        &actor,
        &req.cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/attendance/{id}/reason`.
async fn handle_submit_reason(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<WriteEnvelope<SubmitReasonRequest>>,
) -> Result<Json<AttendanceResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        attendance_id,
        action = %req.request.action,
        "Handling submit_reason request"
    );
    let actor: AuthenticatedActor = req.authenticate()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: AttendanceResponse = submit_reason(
        &mut persistence,
        EngineContext::new(&app_state.config, app_state.broadcaster.as_ref()),
        attendance_id,
        &req.request,
        &actor,
        &req.cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/attendance/{id}/decision`.
async fn handle_decide(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<WriteEnvelope<DecisionRequest>>,
) -> Result<Json<AttendanceResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        attendance_id,
        action = %req.request.action,
        decision = req.request.decision.as_str(),
        "Handling decide request"
    );
    let actor: AuthenticatedActor = req.authenticate()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: AttendanceResponse = decide(
        &mut persistence,
        EngineContext::new(&app_state.config, app_state.broadcaster.as_ref()),
        attendance_id,
        &req.request,
        &actor,
        &req.cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/attendance/decisions`.
async fn handle_decide_bulk(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteEnvelope<BulkDecisionRequest>>,
) -> Result<Json<BulkOutcome>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        items = req.request.items.len(),
        decision = req.request.decision.as_str(),
        "Handling bulk decision request"
    );
    let actor: AuthenticatedActor = req.authenticate()?;

    let mut persistence = app_state.persistence.lock().await;
    let outcome: BulkOutcome = decide_bulk(
        &mut persistence,
        EngineContext::new(&app_state.config, app_state.broadcaster.as_ref()),
        &req.request,
        &actor,
        &req.cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(outcome))
}

/// Handler for GET `/attendance/{id}`.
async fn handle_get_attendance(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AttendanceView>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;
    let mut persistence = app_state.persistence.lock().await;
    let view: AttendanceView = get_attendance(&mut persistence, attendance_id, &actor)?;
    drop(persistence);
    Ok(Json(view))
}

/// Handler for GET `/approvals/pending`.
async fn handle_get_pending(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<PendingApprovalsResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;
    let pending_query: PendingApprovalsQuery = PendingApprovalsQuery {
        office_id: query.office_id,
        supervisor_id: query.supervisor_id,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response: PendingApprovalsResponse =
        get_pending_approvals(&mut persistence, &pending_query, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/officers/{id}/hours`.
async fn handle_hours_summary(
    AxumState(app_state): AxumState<AppState>,
    Path(officer_id): Path<String>,
    Query(query): Query<HoursApiQuery>,
) -> Result<Json<HoursSummaryResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;
    let hours_query: HoursQuery = HoursQuery {
        from: query.from,
        to: query.to,
    };
    let mut persistence = app_state.persistence.lock().await;
    let response: HoursSummaryResponse =
        hours_summary(&mut persistence, &officer_id, &hours_query, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/audit/attendance/{id}`.
async fn handle_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;
    let mut persistence = app_state.persistence.lock().await;
    let response: AuditTimelineResponse = audit_timeline(&mut persistence, attendance_id, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/offices`.
async fn handle_list_offices(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListOfficesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListOfficesResponse = list_offices(&mut persistence)?;
    drop(persistence);
    Ok(Json(response))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/attendance/check_in", post(handle_check_in))
        .route("/attendance/check_out", post(handle_check_out))
        .route("/attendance/decisions", post(handle_decide_bulk))
        .route("/attendance/{attendance_id}", get(handle_get_attendance))
        .route("/attendance/{attendance_id}/reason", post(handle_submit_reason))
        .route("/attendance/{attendance_id}/decision", post(handle_decide))
        .route("/approvals/pending", get(handle_get_pending))
        .route("/officers/{officer_id}/hours", get(handle_hours_summary))
        .route("/audit/attendance/{attendance_id}", get(handle_audit_timeline))
        .route("/offices", get(handle_list_offices))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

/// Reads the offices seed file.
fn load_offices(path: &str) -> Result<Vec<Office>, Box<dyn std::error::Error>> {
    let contents: String = std::fs::read_to_string(path)?;
    let seeds: Vec<OfficeSeed> = serde_json::from_str(&contents)?;
    let offices: Vec<Office> = seeds
        .into_iter()
        .map(OfficeSeed::into_office)
        .collect::<Result<_, _>>()?;
    Ok(offices)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing FieldCheck Server");

    let config: EngineConfig =
        EngineConfig::new(&args.timezone, args.max_photo_bytes, args.conflict_retries)?;
    info!(
        timezone = config.clock.timezone(),
        max_photo_bytes = config.max_photo_bytes,
        conflict_retries = config.conflict_retries,
        "Engine configured"
    );

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(offices_path) = &args.offices {
        let offices: Vec<Office> = load_offices(offices_path)?;
        for office in &offices {
            persistence.upsert_office(office)?;
        }
        info!(count = offices.len(), path = %offices_path, "Loaded offices");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        broadcaster: Arc::new(LiveEventBroadcaster::new()),
        config,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
