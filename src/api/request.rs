//! Request types for the wellbeing audit API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::CostInputs;
use crate::config::BurnoutRiskTable;
use crate::error::{EngineError, EngineResult};
use crate::models::SickLeavePattern;

/// Request body for the `/estimate` endpoint.
///
/// The burnout risk is given either directly or through a sick leave
/// pattern; an explicit `burnout_risk` wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    /// Number of employees.
    pub headcount: u32,
    /// Average annual salary.
    pub avg_salary: Decimal,
    /// Share of vacation entitlement taken, 0-100.
    pub vacation_utilization_pct: u8,
    /// Trust gap, 0-100.
    pub trust_gap_pct: u8,
    /// Burnout risk, 0-1.
    #[serde(default)]
    pub burnout_risk: Option<Decimal>,
    /// Sick leave pattern to derive the burnout risk from.
    #[serde(default)]
    pub sick_leave_pattern: Option<SickLeavePattern>,
}

impl EstimateRequest {
    /// Resolves the burnout risk and builds the estimator inputs.
    pub fn into_inputs(self, risks: &BurnoutRiskTable) -> EngineResult<CostInputs> {
        let burnout_risk = match (self.burnout_risk, self.sick_leave_pattern) {
            (Some(risk), _) => risk,
            (None, Some(pattern)) => risks.risk_for(pattern),
            (None, None) => {
                return Err(EngineError::invalid_input(
                    "burnout_risk",
                    "either burnout_risk or sick_leave_pattern is required",
                ));
            }
        };

        Ok(CostInputs {
            headcount: self.headcount,
            avg_salary: self.avg_salary,
            vacation_utilization_pct: self.vacation_utilization_pct,
            trust_gap_pct: self.trust_gap_pct,
            burnout_risk,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        burnout_risk: Option<Decimal>,
        pattern: Option<SickLeavePattern>,
    ) -> EstimateRequest {
        EstimateRequest {
            headcount: 250,
            avg_salary: Decimal::new(110000, 0),
            vacation_utilization_pct: 60,
            trust_gap_pct: 50,
            burnout_risk,
            sick_leave_pattern: pattern,
        }
    }

    #[test]
    fn test_explicit_risk_wins() {
        let inputs = request(Some(Decimal::new(1, 1)), Some(SickLeavePattern::Chronic))
            .into_inputs(&BurnoutRiskTable::default())
            .unwrap();
        assert_eq!(inputs.burnout_risk, Decimal::new(1, 1));
    }

    #[test]
    fn test_pattern_maps_through_table() {
        let inputs = request(None, Some(SickLeavePattern::Chronic))
            .into_inputs(&BurnoutRiskTable::default())
            .unwrap();
        assert_eq!(inputs.burnout_risk, Decimal::new(7, 1));
    }

    #[test]
    fn test_missing_risk_rejected() {
        let result = request(None, None).into_inputs(&BurnoutRiskTable::default());
        assert!(matches!(
            result,
            Err(EngineError::InvalidInput { ref field, .. }) if field == "burnout_risk"
        ));
    }

    #[test]
    fn test_deserialize_with_pattern() {
        let json = r#"{
            "headcount": 250,
            "avg_salary": "110000",
            "vacation_utilization_pct": 60,
            "trust_gap_pct": 50,
            "sick_leave_pattern": "post-deadline"
        }"#;
        let request: EstimateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.sick_leave_pattern, Some(SickLeavePattern::PostDeadline));
        assert_eq!(request.burnout_risk, None);
    }
}
