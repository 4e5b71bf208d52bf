//! Company lookup.

use tracing::debug;

use crate::config::CompaniesConfig;
use crate::models::CompanyProfile;

/// Resolves a normalized domain to a company profile.
///
/// The session store calls this while holding its lock, so implementations
/// must answer from memory and never block.
pub trait CompanyDirectory: Send + Sync {
    /// Returns the profile for the domain. Unknown domains still yield a
    /// profile so the funnel can continue.
    fn lookup(&self, domain: &str) -> CompanyProfile;
}

/// Directory backed by companies.yaml.
///
/// Each configured company lists domain fragments; the first company with a
/// fragment contained in the domain wins. Everything else gets the fallback
/// profile, named after the domain.
///
/// # Example
///
/// ```
/// use wellbeing_audit::config::CompaniesConfig;
/// use wellbeing_audit::services::{CompanyDirectory, ConfiguredDirectory};
///
/// let directory = ConfiguredDirectory::new(CompaniesConfig::default());
/// let profile = directory.lookup("example.com");
/// assert_eq!(profile.name, "example.com");
/// assert_eq!(profile.headcount, 100);
/// ```
#[derive(Debug, Clone)]
pub struct ConfiguredDirectory {
    companies: CompaniesConfig,
}

impl ConfiguredDirectory {
    /// Creates a directory over the given configuration.
    pub fn new(companies: CompaniesConfig) -> Self {
        Self { companies }
    }
}

impl CompanyDirectory for ConfiguredDirectory {
    fn lookup(&self, domain: &str) -> CompanyProfile {
        let needle = domain.to_lowercase();

        let known = self.companies.companies.iter().find(|company| {
            company
                .domains
                .iter()
                .map(|d| d.trim().to_lowercase())
                .any(|d| !d.is_empty() && needle.contains(&d))
        });

        match known {
            Some(company) => {
                debug!(domain = %domain, company = %company.name, "Matched known company");
                CompanyProfile {
                    domain: domain.to_string(),
                    name: company.name.clone(),
                    logo_url: company.logo_url.clone(),
                    industry: company.industry.clone(),
                    headcount: company.headcount,
                    avg_salary: company.avg_salary,
                }
            }
            None => {
                let fallback = &self.companies.fallback;
                debug!(domain = %domain, "No known company, using fallback profile");
                CompanyProfile {
                    domain: domain.to_string(),
                    name: domain.to_string(),
                    logo_url: None,
                    industry: fallback.industry.clone(),
                    headcount: fallback.headcount,
                    avg_salary: fallback.avg_salary,
                }
            }
        }
    }
}
