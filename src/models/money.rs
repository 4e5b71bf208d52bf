//! Currency and amount formatting.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The single currency every amount in a deployment is expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. "CHF".
    pub code: String,
    /// Prefix used when displaying amounts.
    pub symbol: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            code: "CHF".to_string(),
            symbol: "CHF".to_string(),
        }
    }
}

impl Currency {
    /// Formats an amount in thousands, the way the results headline shows it.
    ///
    /// # Examples
    ///
    /// ```
    /// use wellbeing_audit::models::Currency;
    /// use rust_decimal::Decimal;
    ///
    /// let chf = Currency::default();
    /// assert_eq!(chf.format_thousands(Decimal::new(1750000, 0)), "CHF 1750k");
    /// assert_eq!(chf.format_thousands(Decimal::new(1500, 0)), "CHF 2k");
    /// ```
    pub fn format_thousands(&self, amount: Decimal) -> String {
        let thousands = (amount / Decimal::ONE_THOUSAND)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("{} {}k", self.symbol, thousands.trunc())
    }
}
