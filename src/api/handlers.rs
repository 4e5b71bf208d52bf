//! HTTP request handlers for the wellbeing audit API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::build_estimate_report;
use crate::flow::FunnelEvent;
use crate::models::LeadContact;

use super::request::EstimateRequest;
use super::response::{ApiError, ApiErrorResponse, ReportAccepted};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/estimate", post(estimate_handler))
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/:id",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/:id/events", post(session_event_handler))
        .route("/sessions/:id/report", post(report_handler))
        .route("/sessions/:id/slots", get(slots_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Turns a body rejection into the API's error shape.
fn reject_json(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn session_id(
    correlation_id: Uuid,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Uuid, ApiErrorResponse> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Invalid session id"
        );
        ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "Invalid session id: {}",
            rejection.body_text()
        )))
    })
}

fn log_failure(correlation_id: Uuid, error: crate::error::EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    error.into()
}

/// Handler for POST /estimate.
///
/// Runs the cost estimator on the five inputs and returns the full report.
async fn estimate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing estimate request");

    let Json(request) = payload.map_err(|rejection| reject_json(correlation_id, rejection))?;
    let model = state.config().model();

    let report = request
        .into_inputs(&model.burnout_risk)
        .and_then(|inputs| build_estimate_report(&inputs, model))
        .map_err(|err| log_failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        headcount = report.headcount,
        total_cost = %report.estimate.total_cost,
        duration_us = report.audit_trace.duration_us,
        "Estimate completed successfully"
    );
    Ok(json_response(StatusCode::OK, report))
}

/// Handler for POST /sessions.
async fn create_session_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let view = state
        .sessions()
        .create()
        .map_err(|err| log_failure(correlation_id, err))?;

    info!(correlation_id = %correlation_id, session_id = %view.id, "Session started");
    Ok(json_response(StatusCode::CREATED, view))
}

/// Handler for GET /sessions/{id}.
async fn get_session_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = session_id(correlation_id, path)?;

    let view = state
        .sessions()
        .get(id)
        .map_err(|err| log_failure(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, view))
}

/// Handler for DELETE /sessions/{id}.
async fn delete_session_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = session_id(correlation_id, path)?;

    state
        .sessions()
        .remove(id)
        .map_err(|err| log_failure(correlation_id, err))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for POST /sessions/{id}/events.
///
/// Applies a visitor event. Events the current step does not accept are
/// answered with 409 and leave the session unchanged.
async fn session_event_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<FunnelEvent>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = session_id(correlation_id, path)?;
    let Json(event) = payload.map_err(|rejection| reject_json(correlation_id, rejection))?;
    let event_name = event.name();

    let view = state
        .sessions()
        .dispatch(id, event)
        .map_err(|err| log_failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        session_id = %id,
        event = event_name,
        step = %view.step,
        "Session event applied"
    );
    Ok(json_response(StatusCode::OK, view))
}

/// Handler for POST /sessions/{id}/report.
///
/// Accepts the request and delivers the report after the configured delay.
async fn report_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<LeadContact>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = session_id(correlation_id, path)?;
    let Json(contact) = payload.map_err(|rejection| reject_json(correlation_id, rejection))?;

    let status = state
        .sessions()
        .request_report(id, contact)
        .map_err(|err| log_failure(correlation_id, err))?;

    info!(correlation_id = %correlation_id, session_id = %id, status = ?status, "Report requested");
    Ok(json_response(StatusCode::ACCEPTED, ReportAccepted { status }))
}

/// Handler for GET /sessions/{id}/slots.
async fn slots_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = session_id(correlation_id, path)?;

    let slots = state
        .sessions()
        .offered_slots(id)
        .map_err(|err| log_failure(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, slots))
}
