//! Calculation logic for the wellbeing audit engine.
//!
//! This module contains the hidden-cost formula, split into one function per
//! step (risk profile, days lost, employees at risk, cost per employee, total
//! cost), each returning its value together with an audit step, and the
//! estimator that chains them.
//!
//! The constants are presentation values, not calibrated against real data.

mod attrition;
mod cost;
mod days_lost;
mod estimator;
mod risk_profile;
mod rounding;

pub use attrition::{AttritionResult, BASE_ATTRITION, calculate_employees_at_risk};
pub use cost::{
    CostPerEmployeeResult, TotalCostResult, WORK_DAYS_PER_YEAR, calculate_cost_per_employee,
    calculate_total_cost,
};
pub use days_lost::{BASE_DAYS_LOST, DAYS_LOST_SCALING, DaysLostResult, calculate_days_lost};
pub use estimator::{
    CostInputs, assess_risk_signals, build_estimate_report, estimate_cost, estimate_cost_with,
    estimate_for,
};
pub use risk_profile::{RiskProfileResult, calculate_risk_profile};
pub use rounding::round_half_up;
