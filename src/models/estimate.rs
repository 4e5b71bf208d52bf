//! Cost estimate models.
//!
//! This module contains the [`CostEstimate`] produced by the estimator and the
//! [`EstimateReport`] that wraps it with intermediate factors, display figures
//! and an audit trace of every formula step.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Currency;

/// The four "hidden cost of burnout" figures.
///
/// # Example
///
/// ```
/// use wellbeing_audit::models::CostEstimate;
/// use rust_decimal::Decimal;
///
/// let estimate = CostEstimate {
///     days_lost_per_employee: 14,
///     employees_at_risk: 57,
///     cost_per_employee: Decimal::new(7000, 0),
///     total_cost: Decimal::new(1750000, 0),
/// };
/// assert_eq!(estimate.total_cost, estimate.cost_per_employee * Decimal::from(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Productive days lost per employee per year.
    pub days_lost_per_employee: u32,
    /// Employees at elevated attrition risk.
    pub employees_at_risk: u32,
    /// Cost of the lost days for one employee.
    pub cost_per_employee: Decimal,
    /// `cost_per_employee * headcount`.
    pub total_cost: Decimal,
}

/// The intermediate factors the estimate was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    /// `(100 - vacation_utilization_pct) / 100`.
    pub total_risk_profile: Decimal,
    /// `1 + burnout_risk`.
    pub fatigue_multiplier: Decimal,
    /// The burnout risk used, 0-1.
    pub burnout_risk: Decimal,
}

/// A single step in the audit trace recording one formula application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The formula the rule evaluates.
    pub formula: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the result.
    pub reasoning: String,
}

/// A risk signal raised while estimating.
///
/// Warnings do not change the figures; they flag calibration answers the
/// results screen should call out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for an estimate.
///
/// # Example
///
/// ```
/// use wellbeing_audit::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings raised.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The full results-screen payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateReport {
    /// Unique identifier for this estimate.
    pub estimate_id: Uuid,
    /// When the estimate was produced.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced it.
    pub engine_version: String,
    /// Headcount the estimate was computed for.
    pub headcount: u32,
    /// The figures.
    pub estimate: CostEstimate,
    /// The intermediate factors.
    pub factors: RiskFactors,
    /// Currency every amount is expressed in.
    pub currency: Currency,
    /// Headline total in thousands, e.g. "CHF 1750k".
    pub display_total: String,
    /// Audit trace of the formula steps.
    pub audit_trace: AuditTrace,
}
