//! HTTP API module for the wellbeing audit.
//!
//! This module provides the REST API endpoints for the cost estimator and
//! the funnel session lifecycle.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::EstimateRequest;
pub use response::{ApiError, ReportAccepted};
pub use state::AppState;
