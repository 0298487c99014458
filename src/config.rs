use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::collateral::LmiTable;
use crate::decimal::{DecimalContext, Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::mortgage::LoanInputs;
use crate::types::RepaymentType;

/// calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalculatorConfig {
    pub decimal: DecimalContext,
    pub limits: InputLimits,
    pub lmi: LmiTable,
    /// inputs restored by reset
    pub defaults: LoanInputs,
    /// produce an interest-only-then-P&I schedule for blended loans
    /// instead of an empty one
    pub stitch_blended_schedule: bool,
}

/// accepted ranges for loan inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub max_interest_rate_bps: i64,
    pub min_term_years: u32,
    pub max_term_years: u32,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_interest_rate_bps: 2000,
            min_term_years: 1,
            max_term_years: 40,
        }
    }
}

impl InputLimits {
    /// highest configurable rate limit, 100% p.a.
    pub const MAX_INTEREST_RATE_BPS: i64 = 10_000;

    /// upper rate bound as a percentage, for messages
    pub fn max_interest_percent(&self) -> Decimal {
        Rate::from_bps(self.max_interest_rate_bps)
            .as_percentage()
            .normalize()
    }
}

impl Default for LoanInputs {
    /// $650,000 purchase, $130,000 deposit, 6.25% over 30 years, P&I
    fn default() -> Self {
        Self {
            purchase_price: Money::from_dollars_whole(650_000),
            deposit: Money::from_dollars_whole(130_000),
            interest_rate: Rate::from_bps(625),
            loan_term_years: 30,
            repayment_type: RepaymentType::PrincipalAndInterest,
            interest_only_period_years: None,
            offset_account_balance: Money::ZERO,
        }
    }
}

impl CalculatorConfig {
    /// load from json; missing sections take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| MortgageError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// convert to pretty-printed json string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        DecimalContext::new(self.decimal.precision, self.decimal.rounding)?;

        if self.limits.min_term_years == 0 || self.limits.min_term_years > self.limits.max_term_years {
            return Err(MortgageError::InvalidConfiguration {
                message: format!(
                    "term limits must satisfy 1 <= min <= max, got {}..={}",
                    self.limits.min_term_years, self.limits.max_term_years
                ),
            });
        }

        if !(0..=InputLimits::MAX_INTEREST_RATE_BPS).contains(&self.limits.max_interest_rate_bps) {
            return Err(MortgageError::InvalidConfiguration {
                message: format!(
                    "maximum interest rate must be between 0 and {} bps, got {}",
                    InputLimits::MAX_INTEREST_RATE_BPS,
                    self.limits.max_interest_rate_bps
                ),
            });
        }

        self.lmi.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoundingMode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = CalculatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.decimal.precision, 20);
        assert_eq!(config.decimal.rounding, RoundingMode::HalfUp);
        assert!(!config.stitch_blended_schedule);
        assert_eq!(config.limits.max_interest_percent(), dec!(20));
    }

    #[test]
    fn test_default_inputs() {
        let inputs = LoanInputs::default();
        assert_eq!(inputs.purchase_price.cents(), 65_000_000);
        assert_eq!(inputs.deposit.cents(), 13_000_000);
        assert_eq!(inputs.interest_rate.bps(), 625);
        assert_eq!(inputs.loan_term_years, 30);
        assert_eq!(inputs.repayment_type, RepaymentType::PrincipalAndInterest);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = CalculatorConfig::from_json(
            r#"{ "stitch_blended_schedule": true, "limits": { "max_term_years": 30 } }"#,
        )
        .unwrap();
        assert!(config.stitch_blended_schedule);
        assert_eq!(config.limits.max_term_years, 30);
        assert_eq!(config.limits.min_term_years, 1);
        assert_eq!(config.defaults, LoanInputs::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = CalculatorConfig::default();
        let parsed = CalculatorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(CalculatorConfig::from_json(r#"{ "decimal": { "precision": 0, "rounding": "half_up" } }"#).is_err());
        assert!(CalculatorConfig::from_json(r#"{ "limits": { "min_term_years": 10, "max_term_years": 5 } }"#).is_err());
        assert!(CalculatorConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_rate_limit_is_capped() {
        assert!(CalculatorConfig::from_json(r#"{ "limits": { "max_interest_rate_bps": 10000 } }"#).is_ok());
        assert!(CalculatorConfig::from_json(r#"{ "limits": { "max_interest_rate_bps": 100000 } }"#).is_err());
        assert!(CalculatorConfig::from_json(r#"{ "limits": { "max_interest_rate_bps": -1 } }"#).is_err());
    }
}
