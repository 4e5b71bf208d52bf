//! Funnel steps and the events that move between them.

use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::FlowTimings;
use crate::models::{BookingSlot, CalibrationInputs, LeadContact};

/// The screens of the audit funnel, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStep {
    /// Domain entry.
    Search,
    /// Simulated company lookup; advances on a timer.
    CompanyLookup,
    /// Profile confirmation and salary entry.
    Confirmation,
    /// Free-text people challenge.
    PainPoint,
    /// Calibration sliders.
    Calibration,
    /// Simulated estimate computation; advances on a timer.
    Estimating,
    /// Hidden-cost results and lead gate.
    Results,
    /// Strategy call booking.
    Booking,
}

impl FunnelStep {
    /// Returns the wire name of the step.
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStep::Search => "search",
            FunnelStep::CompanyLookup => "company_lookup",
            FunnelStep::Confirmation => "confirmation",
            FunnelStep::PainPoint => "pain_point",
            FunnelStep::Calibration => "calibration",
            FunnelStep::Estimating => "estimating",
            FunnelStep::Results => "results",
            FunnelStep::Booking => "booking",
        }
    }

    /// The timer that leaves this step, if the step is timer-driven.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use wellbeing_audit::config::FlowTimings;
    /// use wellbeing_audit::flow::{FunnelEvent, FunnelStep};
    ///
    /// let timings = FlowTimings::default();
    /// assert_eq!(
    ///     FunnelStep::CompanyLookup.timer_transition(&timings),
    ///     Some((Duration::from_millis(3500), FunnelEvent::LookupCompleted))
    /// );
    /// assert_eq!(FunnelStep::Search.timer_transition(&timings), None);
    /// ```
    pub fn timer_transition(&self, timings: &FlowTimings) -> Option<(Duration, FunnelEvent)> {
        match self {
            FunnelStep::CompanyLookup => {
                Some((timings.company_lookup(), FunnelEvent::LookupCompleted))
            }
            FunnelStep::Estimating => Some((timings.estimate(), FunnelEvent::EstimateCompleted)),
            _ => None,
        }
    }
}

impl fmt::Display for FunnelStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened to a funnel session.
///
/// Serialized with a `type` tag, e.g.
/// `{"type": "domain_submitted", "domain": "example.com"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FunnelEvent {
    /// The visitor entered a company domain.
    DomainSubmitted {
        /// The raw domain text.
        domain: String,
    },
    /// The lookup timer elapsed.
    LookupCompleted,
    /// The visitor confirmed the profile and entered the average salary.
    CompanyConfirmed {
        /// Average annual salary.
        avg_salary: Decimal,
    },
    /// The visitor described their biggest people challenge.
    PainPointSubmitted {
        /// The free text.
        text: String,
    },
    /// The visitor submitted the calibration answers.
    CalibrationSubmitted(CalibrationInputs),
    /// The estimate timer elapsed.
    EstimateCompleted,
    /// The visitor passed the lead gate.
    LeadCaptured(LeadContact),
    /// The visitor picked a call slot.
    CallBooked(BookingSlot),
    /// The visitor started over.
    Restart,
}

impl FunnelEvent {
    /// Returns the wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            FunnelEvent::DomainSubmitted { .. } => "domain_submitted",
            FunnelEvent::LookupCompleted => "lookup_completed",
            FunnelEvent::CompanyConfirmed { .. } => "company_confirmed",
            FunnelEvent::PainPointSubmitted { .. } => "pain_point_submitted",
            FunnelEvent::CalibrationSubmitted(_) => "calibration_submitted",
            FunnelEvent::EstimateCompleted => "estimate_completed",
            FunnelEvent::LeadCaptured(_) => "lead_captured",
            FunnelEvent::CallBooked(_) => "call_booked",
            FunnelEvent::Restart => "restart",
        }
    }

    /// Whether only the server's timers may raise this event.
    pub fn is_timer_driven(&self) -> bool {
        matches!(
            self,
            FunnelEvent::LookupCompleted | FunnelEvent::EstimateCompleted
        )
    }
}
