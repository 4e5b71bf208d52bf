//! The funnel session state machine.
//!
//! A [`FunnelSession`] holds everything a visitor has entered so far and the
//! step they are on. Events are applied with [`FunnelSession::apply`]; an
//! event that is not allowed in the current step, or whose guard fails,
//! returns an error and leaves the session exactly as it was.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::calculation::estimate_for;
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BookingConfirmation, BookingRequest, BookingSlot, CalibrationInputs, CompanyProfile,
    EstimateReport, LeadContact, ReportRequest, ReportStatus, normalize_domain,
};
use crate::services::{CallScheduler, CompanyDirectory, offered_slots};

use super::{FunnelEvent, FunnelStep};

const REPORT_REQUESTED: &str = "report_requested";
const CALL_BOOKED: &str = "call_booked";

/// What applying an event may consult.
#[derive(Clone, Copy)]
pub struct FunnelContext<'a> {
    /// Model and flow configuration.
    pub config: &'a ConfigLoader,
    /// Resolves domains to company profiles.
    pub directory: &'a dyn CompanyDirectory,
    /// Books strategy calls.
    pub scheduler: &'a dyn CallScheduler,
    /// The date booking slots are offered from.
    pub today: NaiveDate,
}

/// One visitor's progress through the funnel.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelSession {
    id: Uuid,
    step: FunnelStep,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    company: Option<CompanyProfile>,
    pain_point: Option<String>,
    calibration: Option<CalibrationInputs>,
    report: Option<EstimateReport>,
    contact: Option<LeadContact>,
    report_status: ReportStatus,
    booking: Option<BookingConfirmation>,
}

/// Serializable snapshot of a session.
///
/// The estimate stays hidden until the estimating timer has elapsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// Session identifier.
    pub id: Uuid,
    /// Current step.
    pub step: FunnelStep,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session last changed.
    pub updated_at: DateTime<Utc>,
    /// The looked-up and confirmed company.
    pub company: Option<CompanyProfile>,
    /// The visitor's people challenge.
    pub pain_point: Option<String>,
    /// The calibration answers.
    pub calibration: Option<CalibrationInputs>,
    /// The estimate, from the results step on.
    pub report: Option<EstimateReport>,
    /// The captured lead.
    pub contact: Option<LeadContact>,
    /// Report delivery progress.
    pub report_status: ReportStatus,
    /// The booked strategy call.
    pub booking: Option<BookingConfirmation>,
}

impl FunnelSession {
    /// Starts a session on the search step.
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            step: FunnelStep::Search,
            created_at: now,
            updated_at: now,
            company: None,
            pain_point: None,
            calibration: None,
            report: None,
            contact: None,
            report_status: ReportStatus::Idle,
            booking: None,
        }
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current step.
    pub fn step(&self) -> FunnelStep {
        self.step
    }

    /// The looked-up company, with the confirmed salary once confirmed.
    pub fn company(&self) -> Option<&CompanyProfile> {
        self.company.as_ref()
    }

    /// The calibration answers.
    pub fn calibration(&self) -> Option<&CalibrationInputs> {
        self.calibration.as_ref()
    }

    /// The captured lead.
    pub fn contact(&self) -> Option<&LeadContact> {
        self.contact.as_ref()
    }

    /// Report delivery progress.
    pub fn report_status(&self) -> ReportStatus {
        self.report_status
    }

    /// The booked strategy call.
    pub fn booking(&self) -> Option<&BookingConfirmation> {
        self.booking.as_ref()
    }

    /// The computed estimate, once the results step has been reached.
    pub fn report(&self) -> Option<&EstimateReport> {
        if self.step >= FunnelStep::Results {
            self.report.as_ref()
        } else {
            None
        }
    }

    /// Applies an event and returns the step the session is now on.
    pub fn apply(
        &mut self,
        event: FunnelEvent,
        ctx: &FunnelContext<'_>,
    ) -> EngineResult<FunnelStep> {
        let from = self.step;
        let event_name = event.name();

        match (self.step, event) {
            (_, FunnelEvent::Restart) => {
                *self = Self {
                    created_at: self.created_at,
                    ..Self::new(self.id)
                };
            }
            (FunnelStep::Search, FunnelEvent::DomainSubmitted { domain }) => {
                let domain = normalize_domain(&domain)?;
                let profile = ctx.directory.lookup(&domain);
                self.company = Some(profile);
                self.step = FunnelStep::CompanyLookup;
            }
            (FunnelStep::CompanyLookup, FunnelEvent::LookupCompleted) => {
                self.step = FunnelStep::Confirmation;
            }
            (FunnelStep::Confirmation, FunnelEvent::CompanyConfirmed { avg_salary }) => {
                let profile = self
                    .require_company(event_name)?
                    .clone()
                    .with_avg_salary(avg_salary)?;
                self.company = Some(profile);
                self.step = FunnelStep::PainPoint;
            }
            (FunnelStep::PainPoint, FunnelEvent::PainPointSubmitted { text }) => {
                let text = text.trim();
                let min_chars = ctx.config.flow().min_pain_point_chars;
                if text.chars().count() < min_chars {
                    return Err(EngineError::invalid_input(
                        "text",
                        format!("must be at least {} characters", min_chars),
                    ));
                }
                self.pain_point = Some(text.to_string());
                self.step = FunnelStep::Calibration;
            }
            (FunnelStep::Calibration, FunnelEvent::CalibrationSubmitted(inputs)) => {
                inputs.validate()?;
                let report = estimate_for(
                    self.require_company(event_name)?,
                    &inputs,
                    ctx.config.model(),
                )?;
                self.calibration = Some(inputs);
                self.report = Some(report);
                self.step = FunnelStep::Estimating;
            }
            (FunnelStep::Estimating, FunnelEvent::EstimateCompleted) => {
                if self.report.is_none() {
                    return Err(EngineError::CalculationError {
                        message: "estimating step reached without an estimate".to_string(),
                    });
                }
                self.step = FunnelStep::Results;
            }
            (FunnelStep::Results, FunnelEvent::LeadCaptured(contact)) => {
                contact.validate()?;
                self.contact = Some(contact);
                self.step = FunnelStep::Booking;
            }
            (FunnelStep::Booking, FunnelEvent::CallBooked(slot)) if self.booking.is_none() => {
                let request = self.booking_request(slot, ctx)?;
                self.booking = Some(ctx.scheduler.book(&request)?);
            }
            (step, event) => {
                return Err(EngineError::InvalidTransition {
                    step: step.to_string(),
                    event: event.name().to_string(),
                });
            }
        }

        self.updated_at = Utc::now();
        debug!(
            session_id = %self.id,
            from = %from,
            to = %self.step,
            event = event_name,
            "Funnel transition"
        );
        Ok(self.step)
    }

    /// Starts sending the report to `contact`.
    ///
    /// Returns `None` when a report is already sending or sent; the request
    /// is then ignored.
    pub fn request_report(&mut self, contact: LeadContact) -> EngineResult<Option<ReportRequest>> {
        let headline = match self.report() {
            Some(report) => report.display_total.clone(),
            None => return Err(self.invalid_transition(REPORT_REQUESTED)),
        };
        let company_name = self.require_company(REPORT_REQUESTED)?.name.clone();
        contact.validate()?;

        if self.report_status != ReportStatus::Idle {
            debug!(
                session_id = %self.id,
                status = ?self.report_status,
                "Ignoring repeated report request"
            );
            return Ok(None);
        }

        self.report_status = ReportStatus::Sending;
        if self.contact.is_none() {
            self.contact = Some(contact.clone());
        }
        self.updated_at = Utc::now();

        Ok(Some(ReportRequest {
            session_id: self.id,
            contact,
            company_name,
            headline,
        }))
    }

    /// Records the outcome of a report delivery started by
    /// [`request_report`](Self::request_report).
    pub fn finish_report(&mut self, delivered: bool) {
        if self.report_status == ReportStatus::Sending {
            self.report_status = if delivered {
                ReportStatus::Sent
            } else {
                ReportStatus::Idle
            };
            self.updated_at = Utc::now();
        }
    }

    /// Snapshot for API responses.
    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            step: self.step,
            created_at: self.created_at,
            updated_at: self.updated_at,
            company: self.company.clone(),
            pain_point: self.pain_point.clone(),
            calibration: self.calibration,
            report: self.report().cloned(),
            contact: self.contact.clone(),
            report_status: self.report_status,
            booking: self.booking.clone(),
        }
    }

    fn require_company(&self, event: &str) -> EngineResult<&CompanyProfile> {
        self.company
            .as_ref()
            .ok_or_else(|| self.invalid_transition(event))
    }

    fn invalid_transition(&self, event: &str) -> EngineError {
        EngineError::InvalidTransition {
            step: self.step.to_string(),
            event: event.to_string(),
        }
    }

    /// Checks that `slot` can be booked now and builds the scheduler request.
    ///
    /// Together with [`confirm_booking`](Self::confirm_booking) this lets a
    /// caller talk to the scheduler without holding the session.
    pub fn booking_request(
        &self,
        slot: BookingSlot,
        ctx: &FunnelContext<'_>,
    ) -> EngineResult<BookingRequest> {
        if self.step != FunnelStep::Booking || self.booking.is_some() {
            return Err(self.invalid_transition(CALL_BOOKED));
        }
        let contact = self
            .contact()
            .cloned()
            .ok_or_else(|| EngineError::invalid_input("contact", "required before booking"))?;

        if !offered_slots(&ctx.config.flow().booking, ctx.today).contains(&slot) {
            return Err(EngineError::SlotUnavailable {
                slot: slot.to_string(),
            });
        }

        Ok(BookingRequest {
            session_id: self.id,
            contact,
            slot,
        })
    }

    /// Records a booking made from [`booking_request`](Self::booking_request).
    pub fn confirm_booking(&mut self, confirmation: BookingConfirmation) -> EngineResult<()> {
        if self.step != FunnelStep::Booking || self.booking.is_some() {
            return Err(self.invalid_transition(CALL_BOOKED));
        }
        self.booking = Some(confirmation);
        self.updated_at = Utc::now();
        debug!(session_id = %self.id, "Booking recorded");
        Ok(())
    }
}
