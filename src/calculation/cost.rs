//! Cost per employee and total annual cost.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::rounding::round_half_up;

/// Working days per year used to turn a salary into a day rate.
pub const WORK_DAYS_PER_YEAR: Decimal = Decimal::from_parts(220, 0, 0, false, 0);

/// The result of the per-employee cost calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct CostPerEmployeeResult {
    /// Whole-unit cost of the lost days for one employee.
    pub cost_per_employee: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of the total cost calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct TotalCostResult {
    /// `cost_per_employee * headcount`, never independently rounded.
    pub total_cost: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn overflow(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} overflowed", what),
    }
}

/// Computes `round((avg_salary / work_days_per_year) * days_lost_per_employee)`.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::calculation::{WORK_DAYS_PER_YEAR, calculate_cost_per_employee};
/// use rust_decimal::Decimal;
///
/// let result =
///     calculate_cost_per_employee(Decimal::from(110000), 14, WORK_DAYS_PER_YEAR, 5).unwrap();
/// assert_eq!(result.cost_per_employee, Decimal::from(7000));
/// ```
pub fn calculate_cost_per_employee(
    avg_salary: Decimal,
    days_lost_per_employee: u32,
    work_days_per_year: Decimal,
    step_number: u32,
) -> EngineResult<CostPerEmployeeResult> {
    let day_rate = avg_salary
        .checked_div(work_days_per_year)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!(
                "cannot derive a day rate from {} working days",
                work_days_per_year.normalize()
            ),
        })?;
    let raw = day_rate
        .checked_mul(Decimal::from(days_lost_per_employee))
        .ok_or_else(|| overflow("cost per employee"))?;
    let cost_per_employee = round_half_up(raw);

    let audit_step = AuditStep {
        step_number,
        rule_id: "cost_per_employee".to_string(),
        rule_name: "Cost Per Employee".to_string(),
        formula: "round((avg_salary / work_days_per_year) * days_lost_per_employee)".to_string(),
        input: serde_json::json!({
            "avg_salary": avg_salary.normalize().to_string(),
            "work_days_per_year": work_days_per_year.normalize().to_string(),
            "days_lost_per_employee": days_lost_per_employee
        }),
        output: serde_json::json!({
            "day_rate": day_rate.round_dp(4).normalize().to_string(),
            "cost_per_employee": cost_per_employee.normalize().to_string()
        }),
        reasoning: format!(
            "{} / {} x {} days = {}",
            avg_salary.normalize(),
            work_days_per_year.normalize(),
            days_lost_per_employee,
            cost_per_employee.normalize()
        ),
    };

    Ok(CostPerEmployeeResult {
        cost_per_employee,
        audit_step,
    })
}

/// Computes `cost_per_employee * headcount`.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::calculation::calculate_total_cost;
/// use rust_decimal::Decimal;
///
/// let result = calculate_total_cost(Decimal::from(7000), 250, 6).unwrap();
/// assert_eq!(result.total_cost, Decimal::from(1750000));
/// ```
pub fn calculate_total_cost(
    cost_per_employee: Decimal,
    headcount: u32,
    step_number: u32,
) -> EngineResult<TotalCostResult> {
    let total_cost = cost_per_employee
        .checked_mul(Decimal::from(headcount))
        .ok_or_else(|| overflow("total cost"))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "total_cost".to_string(),
        rule_name: "Total Annual Cost".to_string(),
        formula: "cost_per_employee * headcount".to_string(),
        input: serde_json::json!({
            "cost_per_employee": cost_per_employee.normalize().to_string(),
            "headcount": headcount
        }),
        output: serde_json::json!({
            "total_cost": total_cost.normalize().to_string()
        }),
        reasoning: format!(
            "{} x {} employees = {}",
            cost_per_employee.normalize(),
            headcount,
            total_cost.normalize()
        ),
    };

    Ok(TotalCostResult {
        total_cost,
        audit_step,
    })
}
