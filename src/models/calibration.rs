//! Calibration inputs collected from the visitor.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// When the visitor sees the highest spikes in short-term absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SickLeavePattern {
    /// Random spikes such as flu season.
    Reactive,
    /// The crash after big projects.
    PostDeadline,
    /// Constantly high with no recovery.
    Chronic,
}

impl SickLeavePattern {
    /// Returns the wire name of the pattern.
    pub fn as_str(&self) -> &'static str {
        match self {
            SickLeavePattern::Reactive => "reactive",
            SickLeavePattern::PostDeadline => "post-deadline",
            SickLeavePattern::Chronic => "chronic",
        }
    }
}

/// The calibration answers that feed the cost estimate.
///
/// # Example
///
/// ```
/// use wellbeing_audit::models::{CalibrationInputs, SickLeavePattern};
///
/// let inputs = CalibrationInputs::default();
/// assert_eq!(inputs.vacation_utilization_pct, 60);
/// assert_eq!(inputs.sick_leave_pattern, SickLeavePattern::PostDeadline);
/// assert_eq!(inputs.trust_gap_pct, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationInputs {
    /// Share of vacation entitlement actually taken, 0-100.
    pub vacation_utilization_pct: u8,
    /// Observed sick leave pattern.
    pub sick_leave_pattern: SickLeavePattern,
    /// Sentiment variance between high and low performers, 0-100.
    pub trust_gap_pct: u8,
}

impl Default for CalibrationInputs {
    fn default() -> Self {
        Self {
            vacation_utilization_pct: 60,
            sick_leave_pattern: SickLeavePattern::PostDeadline,
            trust_gap_pct: 50,
        }
    }
}

impl CalibrationInputs {
    /// Checks that both percentages are within 0-100.
    pub fn validate(&self) -> EngineResult<()> {
        validate_percentage("vacation_utilization_pct", self.vacation_utilization_pct)?;
        validate_percentage("trust_gap_pct", self.trust_gap_pct)
    }
}

/// Rejects percentages above 100.
pub(crate) fn validate_percentage(field: &str, value: u8) -> EngineResult<()> {
    if value > 100 {
        return Err(EngineError::invalid_input(
            field,
            format!("must be between 0 and 100, got {}", value),
        ));
    }
    Ok(())
}
