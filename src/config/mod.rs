//! Configuration loading and management for the wellbeing audit engine.
//!
//! This module loads the model constants, flow timings, booking slots and
//! company directory from YAML files. Every value has a built-in default, so
//! [`ConfigLoader::default`] is a complete configuration on its own.
//!
//! # Example
//!
//! ```no_run
//! use wellbeing_audit::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Lookup delay: {:?}", config.flow().timings.company_lookup());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AuditConfig, BookingConfig, BurnoutRiskTable, CompaniesConfig, FallbackProfile, FlowConfig,
    FlowTimings, KnownCompany, ModelConfig, ModelConstants, RiskThresholds,
};
