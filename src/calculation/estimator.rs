//! The hidden-cost estimator.
//!
//! Chains the formula steps into a [`CostEstimate`], and optionally wraps it
//! in an [`EstimateReport`] with factors, display figures, risk warnings and
//! the audit trace.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::{BurnoutRiskTable, ModelConfig, ModelConstants, RiskThresholds};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CalibrationInputs, CompanyProfile, CostEstimate,
    EstimateReport, RiskFactors, validate_percentage,
};

use super::attrition::calculate_employees_at_risk;
use super::cost::{calculate_cost_per_employee, calculate_total_cost};
use super::days_lost::calculate_days_lost;
use super::risk_profile::calculate_risk_profile;

/// The five inputs of the cost model.
///
/// # Example
///
/// ```
/// use wellbeing_audit::calculation::{CostInputs, estimate_cost};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let inputs = CostInputs {
///     headcount: 250,
///     avg_salary: Decimal::from(110000),
///     vacation_utilization_pct: 60,
///     trust_gap_pct: 50,
///     burnout_risk: Decimal::from_str("0.4").unwrap(),
/// };
/// let estimate = estimate_cost(&inputs).unwrap();
/// assert_eq!(estimate.days_lost_per_employee, 14);
/// assert_eq!(estimate.employees_at_risk, 57);
/// assert_eq!(estimate.cost_per_employee, Decimal::from(7000));
/// assert_eq!(estimate.total_cost, Decimal::from(1750000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostInputs {
    /// Number of employees, greater than zero.
    pub headcount: u32,
    /// Average annual salary, not negative.
    pub avg_salary: Decimal,
    /// Share of vacation entitlement taken, 0-100.
    pub vacation_utilization_pct: u8,
    /// Trust gap, 0-100.
    pub trust_gap_pct: u8,
    /// Burnout risk, 0-1.
    pub burnout_risk: Decimal,
}

impl CostInputs {
    /// Builds the inputs from a confirmed profile and calibration answers.
    pub fn from_session(
        profile: &CompanyProfile,
        calibration: &CalibrationInputs,
        burnout_risk: &BurnoutRiskTable,
    ) -> Self {
        Self {
            headcount: profile.headcount,
            avg_salary: profile.avg_salary,
            vacation_utilization_pct: calibration.vacation_utilization_pct,
            trust_gap_pct: calibration.trust_gap_pct,
            burnout_risk: burnout_risk.risk_for(calibration.sick_leave_pattern),
        }
    }

    /// Rejects inputs outside their documented ranges.
    pub fn validate(&self) -> EngineResult<()> {
        if self.headcount == 0 {
            return Err(EngineError::invalid_input(
                "headcount",
                "must be greater than zero",
            ));
        }
        if self.avg_salary < Decimal::ZERO {
            return Err(EngineError::invalid_input("avg_salary", "must not be negative"));
        }
        validate_percentage("vacation_utilization_pct", self.vacation_utilization_pct)?;
        validate_percentage("trust_gap_pct", self.trust_gap_pct)?;
        if self.burnout_risk < Decimal::ZERO || self.burnout_risk > Decimal::ONE {
            return Err(EngineError::invalid_input(
                "burnout_risk",
                format!("must be between 0 and 1, got {}", self.burnout_risk.normalize()),
            ));
        }
        Ok(())
    }
}

struct EstimateSteps {
    estimate: CostEstimate,
    factors: RiskFactors,
    audit_steps: Vec<AuditStep>,
}

fn run_steps(inputs: &CostInputs, constants: &ModelConstants) -> EngineResult<EstimateSteps> {
    inputs.validate()?;

    let risk = calculate_risk_profile(inputs.vacation_utilization_pct, inputs.burnout_risk, 1);
    let days = calculate_days_lost(
        risk.total_risk_profile,
        risk.fatigue_multiplier,
        constants.base_days_lost,
        constants.days_lost_scaling,
        2,
    )?;
    let attrition = calculate_employees_at_risk(
        inputs.headcount,
        inputs.burnout_risk,
        inputs.trust_gap_pct,
        constants.base_attrition,
        3,
    )?;
    let per_employee = calculate_cost_per_employee(
        inputs.avg_salary,
        days.days_lost_per_employee,
        constants.work_days_per_year,
        4,
    )?;
    let total = calculate_total_cost(per_employee.cost_per_employee, inputs.headcount, 5)?;

    Ok(EstimateSteps {
        estimate: CostEstimate {
            days_lost_per_employee: days.days_lost_per_employee,
            employees_at_risk: attrition.employees_at_risk,
            cost_per_employee: per_employee.cost_per_employee,
            total_cost: total.total_cost,
        },
        factors: RiskFactors {
            total_risk_profile: risk.total_risk_profile,
            fatigue_multiplier: risk.fatigue_multiplier,
            burnout_risk: inputs.burnout_risk.normalize(),
        },
        audit_steps: vec![
            risk.audit_step,
            days.audit_step,
            attrition.audit_step,
            per_employee.audit_step,
            total.audit_step,
        ],
    })
}

/// Estimates the hidden cost with the built-in constants.
pub fn estimate_cost(inputs: &CostInputs) -> EngineResult<CostEstimate> {
    estimate_cost_with(inputs, &ModelConstants::default())
}

/// Estimates the hidden cost with explicit constants.
pub fn estimate_cost_with(
    inputs: &CostInputs,
    constants: &ModelConstants,
) -> EngineResult<CostEstimate> {
    run_steps(inputs, constants).map(|steps| steps.estimate)
}

/// Flags calibration answers the results screen should call out.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::calculation::{CostInputs, assess_risk_signals};
/// use wellbeing_audit::config::RiskThresholds;
/// use rust_decimal::Decimal;
///
/// let inputs = CostInputs {
///     headcount: 10,
///     avg_salary: Decimal::from(50000),
///     vacation_utilization_pct: 40,
///     trust_gap_pct: 10,
///     burnout_risk: Decimal::ZERO,
/// };
/// let warnings = assess_risk_signals(&inputs, &RiskThresholds::default());
/// assert_eq!(warnings.len(), 1);
/// assert_eq!(warnings[0].code, "LOW_VACATION_UTILIZATION");
/// ```
pub fn assess_risk_signals(inputs: &CostInputs, thresholds: &RiskThresholds) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();

    if inputs.vacation_utilization_pct < thresholds.low_vacation_utilization_pct {
        warnings.push(AuditWarning {
            code: "LOW_VACATION_UTILIZATION".to_string(),
            message: format!(
                "Vacation utilization of {}% is below {}%; \
                 accumulated fatigue raises resignation risk",
                inputs.vacation_utilization_pct, thresholds.low_vacation_utilization_pct
            ),
            severity: "medium".to_string(),
        });
    }
    if inputs.trust_gap_pct > thresholds.high_trust_gap_pct {
        warnings.push(AuditWarning {
            code: "HIGH_TRUST_GAP".to_string(),
            message: format!(
                "Trust gap of {}% exceeds {}%; disengagement may be concentrated in some teams",
                inputs.trust_gap_pct, thresholds.high_trust_gap_pct
            ),
            severity: "high".to_string(),
        });
    }

    warnings
}

/// Produces the full results payload for a set of inputs.
pub fn build_estimate_report(
    inputs: &CostInputs,
    model: &ModelConfig,
) -> EngineResult<EstimateReport> {
    let start_time = Instant::now();
    let steps = run_steps(inputs, &model.constants)?;
    let warnings = assess_risk_signals(inputs, &model.thresholds);
    let duration_us = start_time.elapsed().as_micros() as u64;

    debug!(
        headcount = inputs.headcount,
        total_cost = %steps.estimate.total_cost,
        warnings = warnings.len(),
        duration_us,
        "Estimate computed"
    );

    Ok(EstimateReport {
        estimate_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        headcount: inputs.headcount,
        display_total: model.currency.format_thousands(steps.estimate.total_cost),
        currency: model.currency.clone(),
        estimate: steps.estimate,
        factors: steps.factors,
        audit_trace: AuditTrace {
            steps: steps.audit_steps,
            warnings,
            duration_us,
        },
    })
}

/// Produces the results payload for a funnel session's answers.
pub fn estimate_for(
    profile: &CompanyProfile,
    calibration: &CalibrationInputs,
    model: &ModelConfig,
) -> EngineResult<EstimateReport> {
    let inputs = CostInputs::from_session(profile, calibration, &model.burnout_risk);
    build_estimate_report(&inputs, model)
}
