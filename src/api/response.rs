//! Response types for the wellbeing audit API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::ReportStatus;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid input '{}': {}", field, message),
                    field,
                ),
            },
            EngineError::InvalidTransition { step, event } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "INVALID_TRANSITION",
                    format!("Event '{}' is not allowed in step '{}'", event, step),
                    "The session is not on a step that accepts this event",
                ),
            },
            EngineError::SessionNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("SESSION_NOT_FOUND", format!("Session not found: {}", id)),
            },
            EngineError::SlotUnavailable { slot } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "SLOT_UNAVAILABLE",
                    format!("Booking slot {} is not available", slot),
                    "Pick one of the slots listed for the session",
                ),
            },
            EngineError::DeliveryFailed { message } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details("DELIVERY_FAILED", "Delivery failed", message),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CALCULATION_ERROR",
                    "Calculation failed",
                    message,
                ),
            },
        }
    }
}

/// Body of `POST /sessions/{id}/report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAccepted {
    /// Delivery status after the request.
    pub status: ReportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let api_error: ApiErrorResponse =
            EngineError::invalid_input("headcount", "must be greater than zero").into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_INPUT");
        assert_eq!(api_error.error.details.as_deref(), Some("headcount"));
    }

    #[test]
    fn test_invalid_transition_maps_to_409() {
        let api_error: ApiErrorResponse = EngineError::InvalidTransition {
            step: "search".to_string(),
            event: "call_booked".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.error.code, "INVALID_TRANSITION");
        assert!(api_error.error.message.contains("call_booked"));
    }

    #[test]
    fn test_session_not_found_maps_to_404() {
        let api_error: ApiErrorResponse = EngineError::SessionNotFound { id: Uuid::nil() }.into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "SESSION_NOT_FOUND");
    }

    #[test]
    fn test_slot_unavailable_maps_to_409() {
        let api_error: ApiErrorResponse = EngineError::SlotUnavailable {
            slot: "2026-10-24 08:00".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.error.code, "SLOT_UNAVAILABLE");
    }
}
