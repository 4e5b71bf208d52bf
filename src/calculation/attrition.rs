//! Employees at elevated attrition risk.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::AuditStep;

use super::rounding::round_to_count;

/// Baseline annual attrition rate (12%).
pub const BASE_ATTRITION: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// The result of the attrition calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct AttritionResult {
    /// Whole number of employees at risk of leaving.
    pub employees_at_risk: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes `round(headcount * base_attrition * (1 + burnout_risk + trust_gap_pct / 100))`.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::calculation::{BASE_ATTRITION, calculate_employees_at_risk};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result =
///     calculate_employees_at_risk(250, Decimal::from_str("0.4").unwrap(), 50, BASE_ATTRITION, 3)
///         .unwrap();
/// assert_eq!(result.employees_at_risk, 57);
/// ```
pub fn calculate_employees_at_risk(
    headcount: u32,
    burnout_risk: Decimal,
    trust_gap_pct: u8,
    base_attrition: Decimal,
    step_number: u32,
) -> EngineResult<AttritionResult> {
    let trust_gap = Decimal::from(trust_gap_pct) / Decimal::ONE_HUNDRED;
    let risk_multiplier = Decimal::ONE + burnout_risk + trust_gap;
    let raw = Decimal::from(headcount) * base_attrition * risk_multiplier;
    let employees_at_risk = round_to_count(raw, "employees at risk")?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "employees_at_risk".to_string(),
        rule_name: "Employees At Risk".to_string(),
        formula: "round(headcount * base_attrition * (1 + burnout_risk + trust_gap_pct / 100))"
            .to_string(),
        input: serde_json::json!({
            "headcount": headcount,
            "base_attrition": base_attrition.normalize().to_string(),
            "burnout_risk": burnout_risk.normalize().to_string(),
            "trust_gap_pct": trust_gap_pct
        }),
        output: serde_json::json!({
            "risk_multiplier": risk_multiplier.normalize().to_string(),
            "unrounded": raw.normalize().to_string(),
            "employees_at_risk": employees_at_risk
        }),
        reasoning: format!(
            "{} x {} x {} = {}, rounded to {} employees",
            headcount,
            base_attrition.normalize(),
            risk_multiplier.normalize(),
            raw.normalize(),
            employees_at_risk
        ),
    };

    Ok(AttritionResult {
        employees_at_risk,
        audit_step,
    })
}
