//! Company profile model and domain normalization.
//!
//! A [`CompanyProfile`] is the enriched view of the company the visitor typed
//! in on the first step. It lives only as long as the funnel session.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The company the audit is being run for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// The normalized domain the profile was looked up for.
    pub domain: String,
    /// Display name of the company.
    pub name: String,
    /// Optional logo location.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Industry label.
    pub industry: String,
    /// Number of employees (FTE).
    pub headcount: u32,
    /// Average annual salary per employee in the configured currency.
    pub avg_salary: Decimal,
}

impl CompanyProfile {
    /// Checks the headcount and salary ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use wellbeing_audit::models::CompanyProfile;
    /// use rust_decimal::Decimal;
    ///
    /// let profile = CompanyProfile {
    ///     domain: "example.com".to_string(),
    ///     name: "Example".to_string(),
    ///     logo_url: None,
    ///     industry: "Software".to_string(),
    ///     headcount: 0,
    ///     avg_salary: Decimal::new(80000, 0),
    /// };
    /// assert!(profile.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.headcount == 0 {
            return Err(EngineError::invalid_input(
                "headcount",
                "must be greater than zero",
            ));
        }
        if self.avg_salary < Decimal::ZERO {
            return Err(EngineError::invalid_input("avg_salary", "must not be negative"));
        }
        Ok(())
    }

    /// Returns a copy of the profile with the visitor-confirmed salary.
    pub fn with_avg_salary(mut self, avg_salary: Decimal) -> EngineResult<Self> {
        self.avg_salary = avg_salary;
        self.validate()?;
        Ok(self)
    }
}

/// Normalizes a visitor-entered domain.
///
/// Trims whitespace, lowercases, and strips a leading scheme, a leading
/// `www.` and anything after the host.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::models::normalize_domain;
///
/// assert_eq!(normalize_domain("  https://www.On.com/en-ch ").unwrap(), "on.com");
/// assert!(normalize_domain("   ").is_err());
/// ```
pub fn normalize_domain(raw: &str) -> EngineResult<String> {
    let mut domain = raw.trim().to_lowercase();

    for scheme in ["https://", "http://"] {
        if let Some(rest) = domain.strip_prefix(scheme) {
            domain = rest.to_string();
        }
    }
    if let Some(rest) = domain.strip_prefix("www.") {
        domain = rest.to_string();
    }
    if let Some(end) = domain.find(['/', '?', '#']) {
        domain.truncate(end);
    }

    if domain.is_empty() {
        return Err(EngineError::invalid_input("domain", "must not be empty"));
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(EngineError::invalid_input(
            "domain",
            "must not contain whitespace",
        ));
    }

    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> CompanyProfile {
        CompanyProfile {
            domain: "example.com".to_string(),
            name: "Example".to_string(),
            logo_url: None,
            industry: "Software".to_string(),
            headcount: 250,
            avg_salary: Decimal::new(110000, 0),
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn test_zero_headcount_rejected() {
        let mut profile = sample_profile();
        profile.headcount = 0;
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("headcount"));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let profile = sample_profile().with_avg_salary(Decimal::new(-1, 0));
        assert!(matches!(
            profile,
            Err(EngineError::InvalidInput { ref field, .. }) if field == "avg_salary"
        ));
    }

    #[test]
    fn test_zero_salary_allowed() {
        let profile = sample_profile().with_avg_salary(Decimal::ZERO).unwrap();
        assert_eq!(profile.avg_salary, Decimal::ZERO);
    }

    #[test]
    fn test_normalize_plain_domain() {
        assert_eq!(normalize_domain("example.com").unwrap(), "example.com");
    }

    #[test]
    fn test_normalize_strips_scheme_www_and_path() {
        assert_eq!(
            normalize_domain("HTTP://www.Example.com/about?x=1").unwrap(),
            "example.com"
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(normalize_domain("").is_err());
        assert!(normalize_domain("https://").is_err());
    }

    #[test]
    fn test_normalize_rejects_inner_whitespace() {
        assert!(normalize_domain("exa mple.com").is_err());
    }

    #[test]
    fn test_profile_serializes_logo_as_null() {
        let json = serde_json::to_value(sample_profile()).unwrap();
        assert!(json["logo_url"].is_null());
        assert_eq!(json["avg_salary"], "110000");
    }
}
