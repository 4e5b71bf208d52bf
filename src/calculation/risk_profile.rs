//! Risk profile and fatigue multiplier.
//!
//! Low vacation utilization raises the risk profile; the burnout risk derived
//! from the sick leave pattern raises the fatigue multiplier.

use rust_decimal::Decimal;

use crate::models::AuditStep;

/// The result of deriving the risk profile, including the audit step.
#[derive(Debug, Clone)]
pub struct RiskProfileResult {
    /// `(100 - vacation_utilization_pct) / 100`.
    pub total_risk_profile: Decimal,
    /// `1 + burnout_risk`.
    pub fatigue_multiplier: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Derives the total risk profile and the fatigue multiplier.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::calculation::calculate_risk_profile;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_risk_profile(60, Decimal::from_str("0.4").unwrap(), 1);
/// assert_eq!(result.total_risk_profile, Decimal::from_str("0.4").unwrap());
/// assert_eq!(result.fatigue_multiplier, Decimal::from_str("1.4").unwrap());
/// ```
pub fn calculate_risk_profile(
    vacation_utilization_pct: u8,
    burnout_risk: Decimal,
    step_number: u32,
) -> RiskProfileResult {
    let total_risk_profile = ((Decimal::ONE_HUNDRED - Decimal::from(vacation_utilization_pct))
        / Decimal::ONE_HUNDRED)
        .normalize();
    let fatigue_multiplier = (Decimal::ONE + burnout_risk).normalize();

    let audit_step = AuditStep {
        step_number,
        rule_id: "risk_profile".to_string(),
        rule_name: "Risk Profile".to_string(),
        formula: "risk = (100 - vacation_utilization_pct) / 100; fatigue = 1 + burnout_risk"
            .to_string(),
        input: serde_json::json!({
            "vacation_utilization_pct": vacation_utilization_pct,
            "burnout_risk": burnout_risk.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_risk_profile": total_risk_profile.normalize().to_string(),
            "fatigue_multiplier": fatigue_multiplier.normalize().to_string()
        }),
        reasoning: format!(
            "(100 - {}) / 100 = {}; 1 + {} = {}",
            vacation_utilization_pct,
            total_risk_profile.normalize(),
            burnout_risk.normalize(),
            fatigue_multiplier.normalize()
        ),
    };

    RiskProfileResult {
        total_risk_profile,
        fatigue_multiplier,
        audit_step,
    }
}
