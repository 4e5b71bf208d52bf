//! Configuration types for the wellbeing audit engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every structure has a
//! `Default` matching the built-in constants, so a YAML file only needs to
//! name the values it overrides.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use crate::calculation::{BASE_ATTRITION, BASE_DAYS_LOST, DAYS_LOST_SCALING, WORK_DAYS_PER_YEAR};
use crate::models::{Currency, SickLeavePattern};

/// The arithmetic constants of the cost model.
///
/// These are presentation constants, not calibrated against real data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelConstants {
    /// Industry baseline days lost per employee.
    pub base_days_lost: Decimal,
    /// Baseline annual attrition rate.
    pub base_attrition: Decimal,
    /// Working days per year used to derive a daily salary.
    pub work_days_per_year: Decimal,
    /// Scaling applied to the days-lost product.
    pub days_lost_scaling: Decimal,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            base_days_lost: BASE_DAYS_LOST,
            base_attrition: BASE_ATTRITION,
            work_days_per_year: WORK_DAYS_PER_YEAR,
            days_lost_scaling: DAYS_LOST_SCALING,
        }
    }
}

/// Burnout risk assigned to each sick leave pattern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BurnoutRiskTable {
    /// Risk for random, seasonal spikes.
    pub reactive: Decimal,
    /// Risk for crashes after deadlines.
    pub post_deadline: Decimal,
    /// Risk for constantly high absence.
    pub chronic: Decimal,
}

impl Default for BurnoutRiskTable {
    fn default() -> Self {
        Self {
            reactive: Decimal::new(2, 1),
            post_deadline: Decimal::new(4, 1),
            chronic: Decimal::new(7, 1),
        }
    }
}

impl BurnoutRiskTable {
    /// Returns the burnout risk for a sick leave pattern.
    pub fn risk_for(&self, pattern: SickLeavePattern) -> Decimal {
        match pattern {
            SickLeavePattern::Reactive => self.reactive,
            SickLeavePattern::PostDeadline => self.post_deadline,
            SickLeavePattern::Chronic => self.chronic,
        }
    }
}

/// Thresholds above or below which the estimate raises warnings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Vacation utilization below this percentage is flagged.
    pub low_vacation_utilization_pct: u8,
    /// Trust gaps above this percentage are flagged.
    pub high_trust_gap_pct: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_vacation_utilization_pct: 70,
            high_trust_gap_pct: 30,
        }
    }
}

/// Model configuration from model.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Formula constants.
    pub constants: ModelConstants,
    /// Sick leave pattern to burnout risk mapping.
    pub burnout_risk: BurnoutRiskTable,
    /// Warning thresholds.
    pub thresholds: RiskThresholds,
    /// Currency all amounts are expressed in.
    pub currency: Currency,
}

/// Delays of the timer-driven funnel transitions, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlowTimings {
    /// Simulated company lookup.
    pub company_lookup_ms: u64,
    /// Simulated estimate computation.
    pub estimate_ms: u64,
    /// Simulated report delivery.
    pub report_delivery_ms: u64,
    /// Inactivity after which a session is discarded.
    pub session_idle_ms: u64,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            company_lookup_ms: 3500,
            estimate_ms: 7000,
            report_delivery_ms: 2000,
            session_idle_ms: 1_800_000,
        }
    }
}

impl FlowTimings {
    /// Delay before the lookup completes.
    pub fn company_lookup(&self) -> Duration {
        Duration::from_millis(self.company_lookup_ms)
    }

    /// Delay before the estimate is shown.
    pub fn estimate(&self) -> Duration {
        Duration::from_millis(self.estimate_ms)
    }

    /// Delay before a report counts as delivered.
    pub fn report_delivery(&self) -> Duration {
        Duration::from_millis(self.report_delivery_ms)
    }

    /// How long a session may go untouched before it is discarded.
    pub fn session_idle(&self) -> Duration {
        Duration::from_millis(self.session_idle_ms)
    }
}

/// Strategy call booking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Number of consecutive days offered, starting tomorrow.
    pub days_offered: u32,
    /// Morning start times.
    pub morning_slots: Vec<NaiveTime>,
    /// Afternoon start times.
    pub afternoon_slots: Vec<NaiveTime>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        Self {
            days_offered: 4,
            morning_slots: vec![at(9, 0), at(9, 30), at(10, 0), at(11, 30)],
            afternoon_slots: vec![at(13, 0), at(14, 30), at(15, 0), at(16, 45)],
        }
    }
}

/// Flow configuration from flow.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Timer delays.
    pub timings: FlowTimings,
    /// Booking slots.
    pub booking: BookingConfig,
    /// Minimum length of the pain point text.
    pub min_pain_point_chars: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            timings: FlowTimings::default(),
            booking: BookingConfig::default(),
            min_pain_point_chars: 10,
        }
    }
}

/// A company the directory recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnownCompany {
    /// Domain fragments that identify the company (case-insensitive).
    pub domains: Vec<String>,
    /// Display name.
    pub name: String,
    /// Logo location.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Industry label.
    pub industry: String,
    /// Number of employees.
    pub headcount: u32,
    /// Average annual salary.
    pub avg_salary: Decimal,
}

/// Profile values used for domains the directory does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FallbackProfile {
    /// Industry label.
    pub industry: String,
    /// Number of employees.
    pub headcount: u32,
    /// Average annual salary.
    pub avg_salary: Decimal,
}

impl Default for FallbackProfile {
    fn default() -> Self {
        Self {
            industry: "Unknown Industry".to_string(),
            headcount: 100,
            avg_salary: Decimal::new(80000, 0),
        }
    }
}

/// Company directory configuration from companies.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompaniesConfig {
    /// Recognized companies, first match wins.
    pub companies: Vec<KnownCompany>,
    /// Profile for everything else.
    pub fallback: FallbackProfile,
}

/// The complete configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a configuration directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditConfig {
    model: ModelConfig,
    flow: FlowConfig,
    companies: CompaniesConfig,
}

impl AuditConfig {
    /// Creates a new AuditConfig from its component parts.
    pub fn new(model: ModelConfig, flow: FlowConfig, companies: CompaniesConfig) -> Self {
        Self {
            model,
            flow,
            companies,
        }
    }

    /// Returns the model configuration.
    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Returns the flow configuration.
    pub fn flow(&self) -> &FlowConfig {
        &self.flow
    }

    /// Returns the company directory configuration.
    pub fn companies(&self) -> &CompaniesConfig {
        &self.companies
    }
}
