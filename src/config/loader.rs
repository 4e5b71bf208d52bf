//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the audit
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{AuditConfig, CompaniesConfig, FlowConfig, ModelConfig};

/// Loads and provides access to the audit configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── model.yaml      # Formula constants, burnout risks, currency
/// ├── flow.yaml       # Timer delays, booking slots
/// └── companies.yaml  # Company directory and fallback profile
/// ```
///
/// # Example
///
/// ```no_run
/// use wellbeing_audit::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Currency: {}", loader.model().currency.code);
/// # Ok::<(), wellbeing_audit::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AuditConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing, contains invalid YAML, or
    /// holds values outside their allowed ranges.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let model_path = path.join("model.yaml");
        let model = Self::load_yaml::<ModelConfig>(&model_path)?;
        Self::validate_model(&model, &model_path)?;

        let flow_path = path.join("flow.yaml");
        let flow = Self::load_yaml::<FlowConfig>(&flow_path)?;
        Self::validate_flow(&flow, &flow_path)?;

        let companies_path = path.join("companies.yaml");
        let companies = Self::load_yaml::<CompaniesConfig>(&companies_path)?;
        Self::validate_companies(&companies, &companies_path)?;

        debug!(
            path = %path.display(),
            currency = %model.currency.code,
            known_companies = companies.companies.len(),
            "Loaded audit configuration"
        );

        Ok(Self {
            config: AuditConfig::new(model, flow, companies),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_model(model: &ModelConfig, path: &Path) -> EngineResult<()> {
        let invalid = |message: String| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        if model.constants.work_days_per_year <= Decimal::ZERO {
            return Err(invalid("work_days_per_year must be positive".to_string()));
        }
        let risks = &model.burnout_risk;
        for (name, risk) in [
            ("reactive", risks.reactive),
            ("post_deadline", risks.post_deadline),
            ("chronic", risks.chronic),
        ] {
            if risk < Decimal::ZERO || risk > Decimal::ONE {
                return Err(invalid(format!(
                    "burnout_risk.{} must be between 0 and 1, got {}",
                    name, risk
                )));
            }
        }
        Ok(())
    }

    fn validate_flow(flow: &FlowConfig, path: &Path) -> EngineResult<()> {
        if flow.timings.session_idle_ms == 0 {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: "timings.session_idle_ms must be positive".to_string(),
            });
        }
        Ok(())
    }

    fn validate_companies(companies: &CompaniesConfig, path: &Path) -> EngineResult<()> {
        let invalid = |message: String| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        for company in &companies.companies {
            if company.headcount == 0 {
                return Err(invalid(format!("{} has a headcount of zero", company.name)));
            }
            if company.domains.iter().all(|d| d.trim().is_empty()) {
                return Err(invalid(format!("{} lists no domains", company.name)));
            }
        }
        if companies.fallback.headcount == 0 {
            return Err(invalid("fallback headcount must be positive".to_string()));
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Returns the model configuration.
    pub fn model(&self) -> &ModelConfig {
        self.config.model()
    }

    /// Returns the flow configuration.
    pub fn flow(&self) -> &FlowConfig {
        self.config.flow()
    }

    /// Returns the company directory configuration.
    pub fn companies(&self) -> &CompaniesConfig {
        self.config.companies()
    }
}
