//! Error types for the wellbeing audit engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every error condition the estimator, the funnel and the service
//! layer can report.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the wellbeing audit engine.
///
/// # Example
///
/// ```
/// use wellbeing_audit::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "headcount".to_string(),
///     message: "must be greater than zero".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid input 'headcount': must be greater than zero"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input value was outside its allowed range or missing.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The funnel received an event that is not allowed in its current step.
    #[error("Event '{event}' is not allowed in step '{step}'")]
    InvalidTransition {
        /// The step the session was in.
        step: String,
        /// The rejected event.
        event: String,
    },

    /// No funnel session exists with the given id.
    #[error("Session not found: {id}")]
    SessionNotFound {
        /// The requested session id.
        id: Uuid,
    },

    /// The requested booking slot is not on offer.
    #[error("Booking slot {slot} is not available")]
    SlotUnavailable {
        /// The requested slot, formatted as `YYYY-MM-DD HH:MM`.
        slot: String,
    },

    /// An external collaborator (mailer, scheduler) refused the request.
    #[error("Delivery failed: {message}")]
    DeliveryFailed {
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/model.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/model.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/flow.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/flow.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_input_helper_builds_variant() {
        let error = EngineError::invalid_input("trust_gap_pct", "must be between 0 and 100");
        assert!(matches!(
            error,
            EngineError::InvalidInput { ref field, .. } if field == "trust_gap_pct"
        ));
        assert_eq!(
            error.to_string(),
            "Invalid input 'trust_gap_pct': must be between 0 and 100"
        );
    }

    #[test]
    fn test_invalid_transition_displays_step_and_event() {
        let error = EngineError::InvalidTransition {
            step: "search".to_string(),
            event: "lookup_completed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Event 'lookup_completed' is not allowed in step 'search'"
        );
    }

    #[test]
    fn test_session_not_found_displays_id() {
        let id = Uuid::nil();
        let error = EngineError::SessionNotFound { id };
        assert_eq!(
            error.to_string(),
            "Session not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_slot_unavailable_displays_slot() {
        let error = EngineError::SlotUnavailable {
            slot: "2026-10-25 09:00".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Booking slot 2026-10-25 09:00 is not available"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_input() -> EngineResult<()> {
            Err(EngineError::invalid_input("headcount", "must be greater than zero"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_input()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
