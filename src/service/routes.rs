//! Axum routes for the LDP kernel service.

use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::KernelError;
use crate::negotiation::{parse_elements, PreferenceSet};
use crate::query;
use crate::representation::{CompactEnvelope, RecordDetails, Representation};
use crate::types::version::check_not_modified;
use crate::types::{RecordKey, Triple, VersionTag};
use crate::vocab::{ldp, oslc};

use super::state::ServiceState;

/// Type alias for the shared router state.
pub type AppState = ServiceState;

/// OSLC media type for the JSON compact form. Treated like
/// `application/json` when choosing between the compact JSON and triples.
pub const COMPACT_JSON: &str = "application/x-oslc-compact+json";

/// Media type of the triple document accepted by `POST /bugs`.
pub const TRIPLES_JSON: &str = "application/json";

const PREFER_HEADER: HeaderName = HeaderName::from_static("prefer");
const PREFERENCE_APPLIED_HEADER: HeaderName = HeaderName::from_static("preference-applied");
const ACCEPT_POST_HEADER: HeaderName = HeaderName::from_static("accept-post");

const CONTAINER_ALLOW: &str = "GET, HEAD, POST, OPTIONS";
const RECORD_ALLOW: &str = "GET, HEAD, DELETE, OPTIONS";
const DIALOG_ALLOW: &str = "GET, HEAD, OPTIONS";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response to a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// IRI of the new record.
    pub uri: String,
}

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Records currently in the container.
    pub record_count: usize,
    /// Number of committed write scopes.
    pub generation: u64,
    /// Current container version tag.
    pub container_tag: String,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub details: Option<String>,
}

/// Structured error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

impl From<&KernelError> for ErrorResponse {
    fn from(err: &KernelError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

/// A [`KernelError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub KernelError);

impl From<KernelError> for ApiError {
    fn from(err: KernelError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            KernelError::NotFound(_) => StatusCode::NOT_FOUND,
            KernelError::NotModified(_) => StatusCode::NOT_MODIFIED,
            KernelError::BadInput(_) | KernelError::BadQuery(_) => StatusCode::BAD_REQUEST,
            KernelError::AlreadyExists(_) => StatusCode::CONFLICT,
            KernelError::LockTimeout => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let KernelError::NotModified(tag) = &self.0 {
            let mut response = status.into_response();
            set_header(&mut response, header::ETAG, tag.as_str());
            return response;
        }

        tracing::warn!(code = self.0.code(), error = %self.0, "Request error");
        let body = ErrorResponse::from(&self.0);
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

// ============================================================================
// Header helpers
// ============================================================================

fn header_values<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Vec<&'a str> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect()
}

fn preferences(headers: &HeaderMap) -> PreferenceSet {
    PreferenceSet::parse(&header_values(headers, &PREFER_HEADER))
}

fn if_none_match(headers: &HeaderMap) -> Vec<&str> {
    header_values(headers, &header::IF_NONE_MATCH)
}

fn accepts(headers: &HeaderMap, media_type: &str) -> bool {
    header_values(headers, &header::ACCEPT)
        .into_iter()
        .flat_map(parse_elements)
        .any(|e| e.name.eq_ignore_ascii_case(media_type))
}

/// Whether the client asked for plain JSON rather than a triple document.
fn wants_compact_json(headers: &HeaderMap) -> bool {
    accepts(headers, TRIPLES_JSON) || accepts(headers, COMPACT_JSON)
}

/// `Content-Type` for a compact JSON body, echoing the OSLC type if asked for.
fn compact_json_type(headers: &HeaderMap) -> &'static str {
    if accepts(headers, COMPACT_JSON) {
        COMPACT_JSON
    } else {
        TRIPLES_JSON
    }
}

fn set_header(response: &mut Response, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response.headers_mut().insert(name, value);
        }
        Err(_) => debug!(header = %name, "Dropping header with invalid value"),
    }
}

fn link(target: &str, rel: &str) -> String {
    format!("<{}>; rel=\"{}\"", target, rel)
}

fn container_links(state: &AppState) -> String {
    let config = state.builder.config();
    [
        link(ldp::BASIC_CONTAINER, "type"),
        link(ldp::RESOURCE, "type"),
        link(&config.shape_uri, ldp::LINK_REL_CONSTRAINED_BY),
        link(&config.dialog_uri, oslc::LINK_REL_CREATION_DIALOG),
    ]
    .join(", ")
}

fn record_links(key: &RecordKey) -> String {
    [
        link(ldp::RESOURCE, "type"),
        link(&key.child(crate::representation::COMPACT_SEGMENT), oslc::LINK_REL_COMPACT),
    ]
    .join(", ")
}

fn record_headers(response: &mut Response, key: &RecordKey, tag: &VersionTag) {
    set_header(response, header::ALLOW, RECORD_ALLOW);
    set_header(response, header::LINK, &record_links(key));
    set_header(response, header::ETAG, tag.as_str());
}

fn container_headers(response: &mut Response, state: &AppState) {
    set_header(response, header::ALLOW, CONTAINER_ALLOW);
    set_header(response, header::LINK, &container_links(state));
    set_header(response, ACCEPT_POST_HEADER, TRIPLES_JSON);
}

/// Serialize a representation with its `ETag` and `Preference-Applied`.
fn graph_response(rep: Representation) -> Response {
    let Representation {
        graph,
        tag,
        preference_applied,
        ..
    } = rep;
    let mut response = (StatusCode::OK, Json(graph)).into_response();
    if let Some(tag) = tag {
        set_header(&mut response, header::ETAG, tag.as_str());
    }
    if let Some(value) = preference_applied.header_value() {
        set_header(&mut response, PREFERENCE_APPLIED_HEADER, value);
    }
    response
}

// ============================================================================
// Container Handlers
// ============================================================================

/// Read the container.
async fn get_container_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let prefs = preferences(&headers);
    let rep = {
        let guard = state.read()?;
        check_not_modified(&if_none_match(&headers), guard.container_tag())?;
        state.builder.container(&guard, &prefs)
    };

    let mut response = graph_response(rep);
    container_headers(&mut response, &state);
    Ok(response)
}

/// Container metadata headers without a body.
async fn options_container_handler(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let tag = state.read()?.container_tag().clone();

    let mut response = StatusCode::NO_CONTENT.into_response();
    container_headers(&mut response, &state);
    set_header(&mut response, header::ETAG, tag.as_str());
    Ok(response)
}

/// Create a record from a JSON triple document.
async fn create_record_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let triples: Vec<Triple> = serde_json::from_slice(&body)
        .map_err(|e| KernelError::BadInput(format!("invalid triple document: {}", e)))?;

    let key = state.store.create_record(state.container_uri(), triples)?;

    let mut response = (
        StatusCode::CREATED,
        Json(CreatedResponse {
            uri: key.to_string(),
        }),
    )
        .into_response();
    set_header(&mut response, header::LOCATION, key.as_str());
    Ok(response)
}

/// Creation dialog descriptor.
async fn creation_dialog_handler(State(state): State<Arc<AppState>>) -> Response {
    graph_response(state.builder.dialog())
}

/// Methods allowed on the creation dialog. Prefill is not offered.
async fn options_dialog_handler() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    set_header(&mut response, header::ALLOW, DIALOG_ALLOW);
    response
}

/// Evaluate a `SELECT` query over all records.
async fn sparql_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<Json<query::QueryResults>> {
    let query = query::parse(&body)?;
    let results = {
        let guard = state.read()?;
        query.evaluate(guard.records().map(|r| &r.body))
    };
    debug!(rows = results.len(), "Query evaluated");
    Ok(Json(results))
}

// ============================================================================
// Record Handlers
// ============================================================================

/// Read a record, its compact form, or both.
///
/// `include=PreferCompact` with a JSON `Accept` returns the
/// `{"compact": ...}` envelope. Without a JSON `Accept` it returns the
/// compact triples merged with the body.
async fn get_record_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let key = RecordKey::member(state.container_uri(), &id);
    let prefs = preferences(&headers);

    let guard = state.read()?;
    let record = guard.get(&key)?;
    let tag = guard.record_tag(&key)?.clone();
    check_not_modified(&if_none_match(&headers), &tag)?;

    let mut response = if prefs.wants(oslc::PREFER_COMPACT) && wants_compact_json(&headers) {
        let envelope = CompactEnvelope {
            compact: state.builder.compact_summary(record),
        };
        drop(guard);
        let mut response = Json(envelope).into_response();
        set_header(&mut response, header::CONTENT_TYPE, compact_json_type(&headers));
        set_header(&mut response, PREFERENCE_APPLIED_HEADER, "return=representation");
        response
    } else {
        let rep = state.builder.record(record, tag.clone(), &prefs);
        drop(guard);
        graph_response(rep)
    };

    record_headers(&mut response, &key, &tag);
    Ok(response)
}

/// Record metadata headers without a body. 404 if the record is gone.
async fn options_record_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let key = RecordKey::member(state.container_uri(), &id);
    let tag = state.read()?.record_tag(&key)?.clone();

    let mut response = StatusCode::NO_CONTENT.into_response();
    record_headers(&mut response, &key, &tag);
    Ok(response)
}

/// Delete a record.
async fn delete_record_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let key = RecordKey::member(state.container_uri(), &id);
    state.store.delete_record(&key)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Compact form of a record on its own.
///
/// A JSON `Accept` gets the summary object; anything else gets the compact
/// triples rooted at `<record>/compact`.
async fn compact_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let key = RecordKey::member(state.container_uri(), &id);

    if wants_compact_json(&headers) {
        let summary = {
            let guard = state.read()?;
            state.builder.compact_summary(guard.get(&key)?)
        };
        let mut response = Json(summary).into_response();
        set_header(&mut response, header::CONTENT_TYPE, compact_json_type(&headers));
        return Ok(response);
    }

    let graph = {
        let guard = state.read()?;
        state.builder.compact_graph(guard.get(&key)?)
    };
    Ok(Json(graph).into_response())
}

/// Display fields of a record.
async fn preview_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<RecordDetails>> {
    let key = RecordKey::member(state.container_uri(), &id);
    let details = RecordDetails::from_record(state.read()?.get(&key)?);
    Ok(Json(details))
}

// ============================================================================
// Health Handlers
// ============================================================================

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let guard = state.read()?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        record_count: guard.len(),
        generation: guard.generation(),
        container_tag: guard.container_tag().to_string(),
    }))
}

/// Liveness probe endpoint.
///
/// Returns 200 if the process is alive. Does not touch the store.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 if the store lock can be taken, 503 otherwise.
async fn readiness_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    match state.read() {
        Ok(_) => Ok(Json(ReadinessResponse {
            ready: true,
            details: None,
        })),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                details: Some(e.to_string()),
            }),
        )),
    }
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the LDP kernel service.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Container
        .route(
            "/bugs",
            get(get_container_handler)
                .post(create_record_handler)
                .options(options_container_handler),
        )
        .route(
            "/bugs/creationDialog",
            get(creation_dialog_handler).options(options_dialog_handler),
        )
        .route("/bugs/sparql", post(sparql_handler))
        // Records
        .route(
            "/bugs/:id",
            get(get_record_handler)
                .delete(delete_record_handler)
                .options(options_record_handler),
        )
        .route("/bugs/:id/compact", get(compact_handler))
        .route("/bugs/:id/preview", get(preview_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(state)
}
