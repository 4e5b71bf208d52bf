//! Report delivery.

use std::sync::Mutex;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{DeliveryReceipt, ReportRequest};

/// Sends the audit report to a captured lead.
pub trait ReportMailer: Send + Sync {
    /// Hands the report off for delivery.
    fn deliver(&self, request: &ReportRequest) -> EngineResult<DeliveryReceipt>;
}

/// Mailer that accepts every report and keeps it in memory.
#[derive(Debug, Default)]
pub struct SimulatedMailer {
    delivered: Mutex<Vec<ReportRequest>>,
}

impl SimulatedMailer {
    /// Creates an empty mailer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every report delivered so far.
    pub fn delivered(&self) -> Vec<ReportRequest> {
        self.delivered
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl ReportMailer for SimulatedMailer {
    fn deliver(&self, request: &ReportRequest) -> EngineResult<DeliveryReceipt> {
        let mut delivered = self.delivered.lock().map_err(|_| EngineError::DeliveryFailed {
            message: "mailer state poisoned".to_string(),
        })?;
        delivered.push(request.clone());

        info!(
            session_id = %request.session_id,
            company = %request.company_name,
            "Report delivered"
        );

        Ok(DeliveryReceipt {
            receipt_id: Uuid::new_v4(),
            email: request.contact.email.clone(),
            delivered_at: Utc::now(),
        })
    }
}
