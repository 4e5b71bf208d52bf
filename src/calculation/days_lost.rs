//! Productive days lost per employee.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::AuditStep;

use super::rounding::round_to_count;

/// Industry baseline days lost per employee per year.
pub const BASE_DAYS_LOST: Decimal = Decimal::from_parts(14, 0, 0, false, 0);

/// Scaling applied on top of the risk and fatigue factors.
pub const DAYS_LOST_SCALING: Decimal = Decimal::from_parts(18, 0, 0, false, 1);

/// The result of the days-lost calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct DaysLostResult {
    /// Whole days lost per employee per year.
    pub days_lost_per_employee: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes `round(base_days_lost * risk_profile * fatigue_multiplier * scaling)`.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::calculation::{BASE_DAYS_LOST, DAYS_LOST_SCALING, calculate_days_lost};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_days_lost(
///     Decimal::from_str("0.4").unwrap(),
///     Decimal::from_str("1.4").unwrap(),
///     BASE_DAYS_LOST,
///     DAYS_LOST_SCALING,
///     2,
/// )
/// .unwrap();
/// assert_eq!(result.days_lost_per_employee, 14);
/// ```
pub fn calculate_days_lost(
    total_risk_profile: Decimal,
    fatigue_multiplier: Decimal,
    base_days_lost: Decimal,
    scaling: Decimal,
    step_number: u32,
) -> EngineResult<DaysLostResult> {
    let raw = base_days_lost * total_risk_profile * fatigue_multiplier * scaling;
    let days_lost_per_employee = round_to_count(raw, "days lost per employee")?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "days_lost".to_string(),
        rule_name: "Days Lost Per Employee".to_string(),
        formula: "round(base_days_lost * total_risk_profile * fatigue_multiplier * scaling)"
            .to_string(),
        input: serde_json::json!({
            "base_days_lost": base_days_lost.normalize().to_string(),
            "total_risk_profile": total_risk_profile.normalize().to_string(),
            "fatigue_multiplier": fatigue_multiplier.normalize().to_string(),
            "scaling": scaling.normalize().to_string()
        }),
        output: serde_json::json!({
            "unrounded": raw.normalize().to_string(),
            "days_lost_per_employee": days_lost_per_employee
        }),
        reasoning: format!(
            "{} x {} x {} x {} = {}, rounded to {} days",
            base_days_lost.normalize(),
            total_risk_profile.normalize(),
            fatigue_multiplier.normalize(),
            scaling.normalize(),
            raw.normalize(),
            days_lost_per_employee
        ),
    };

    Ok(DaysLostResult {
        days_lost_per_employee,
        audit_step,
    })
}
