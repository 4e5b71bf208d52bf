//! Core data models for the wellbeing audit engine.
//!
//! Every entity here is transient: it is created when the visitor completes
//! the corresponding funnel step and discarded on restart.

mod calibration;
mod company;
mod estimate;
mod lead;
mod money;

pub use calibration::{CalibrationInputs, SickLeavePattern};
pub(crate) use calibration::validate_percentage;
pub use company::{CompanyProfile, normalize_domain};
pub use estimate::{AuditStep, AuditTrace, AuditWarning, CostEstimate, EstimateReport, RiskFactors};
pub use lead::{
    BookingConfirmation, BookingRequest, BookingSlot, DeliveryReceipt, LeadContact, ReportRequest,
    ReportStatus,
};
pub use money::Currency;
