use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{DecimalContext, Money};
use crate::errors::{MortgageError, Result};

/// premium rate applied while lvr is at or below `max_lvr`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmiBand {
    /// inclusive upper bound in percent; `None` is open-ended
    pub max_lvr: Option<Decimal>,
    /// fraction of the full loan amount
    pub premium_rate: Decimal,
}

/// lvr threshold and banded premium rates
///
/// a coarse flat-rate banding of the whole loan amount, not any insurer's
/// premium schedule; the estimate is an indication only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmiTable {
    /// lmi applies strictly above this lvr (percent)
    pub threshold: Decimal,
    /// ascending bands; the first band whose bound covers the lvr applies
    pub bands: Vec<LmiBand>,
}

impl Default for LmiTable {
    fn default() -> Self {
        Self {
            threshold: dec!(80),
            bands: vec![
                LmiBand { max_lvr: Some(dec!(85)), premium_rate: dec!(0.01) },
                LmiBand { max_lvr: Some(dec!(90)), premium_rate: dec!(0.02) },
                LmiBand { max_lvr: Some(dec!(95)), premium_rate: dec!(0.03) },
                LmiBand { max_lvr: None, premium_rate: dec!(0.04) },
            ],
        }
    }
}

impl LmiTable {
    /// bands must be ascending, end open-ended and carry non-negative rates
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(MortgageError::InvalidConfiguration {
                message: message.to_string(),
            })
        };

        let Some(last) = self.bands.last() else {
            return invalid("lmi table has no bands");
        };
        if last.max_lvr.is_some() {
            return invalid("last lmi band must be open-ended");
        }

        let mut floor = self.threshold;
        for band in &self.bands {
            if band.premium_rate.is_sign_negative() {
                return invalid("lmi premium rate cannot be negative");
            }
            if let Some(max) = band.max_lvr {
                if max <= floor {
                    return invalid("lmi bands must be ascending and above the threshold");
                }
                floor = max;
            }
        }
        Ok(())
    }

    pub fn applies(&self, lvr: Decimal) -> bool {
        lvr > self.threshold
    }

    /// premium rate for an lvr, zero at or below the threshold
    pub fn premium_rate(&self, lvr: Decimal) -> Decimal {
        if !self.applies(lvr) {
            return Decimal::ZERO;
        }
        self.bands
            .iter()
            .find(|band| band.max_lvr.map_or(true, |max| lvr <= max))
            .map(|band| band.premium_rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// premium against the full loan amount, rounded to the cent
    pub fn estimate(&self, loan_amount: Money, lvr: Decimal, ctx: &DecimalContext) -> Money {
        let rate = self.premium_rate(lvr);
        if rate.is_zero() {
            return Money::ZERO;
        }
        ctx.round_money(loan_amount.as_decimal() * rate)
    }
}

/// estimate lmi with the default table; zero when lvr <= 80
pub fn calculate_lmi(loan_amount: Money, lvr: Decimal) -> Money {
    LmiTable::default().estimate(loan_amount, lvr, &DecimalContext::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_lmi_at_or_below_threshold() {
        let loan = Money::from_dollars_whole(520_000);
        assert_eq!(calculate_lmi(loan, dec!(80)), Money::ZERO);
        assert_eq!(calculate_lmi(loan, dec!(65.5)), Money::ZERO);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let loan = Money::from_dollars_whole(100_000);
        assert_eq!(calculate_lmi(loan, dec!(80.01)), Money::from_dollars_whole(1_000));
        assert_eq!(calculate_lmi(loan, dec!(85)), Money::from_dollars_whole(1_000));
        assert_eq!(calculate_lmi(loan, dec!(85.01)), Money::from_dollars_whole(2_000));
        assert_eq!(calculate_lmi(loan, dec!(90)), Money::from_dollars_whole(2_000));
        assert_eq!(calculate_lmi(loan, dec!(95)), Money::from_dollars_whole(3_000));
        assert_eq!(calculate_lmi(loan, dec!(95.5)), Money::from_dollars_whole(4_000));
    }

    #[test]
    fn test_five_percent_deposit() {
        let lmi = calculate_lmi(Money::from_dollars_whole(475_000), dec!(95));
        assert_eq!(lmi, Money::from_dollars_whole(14_250));
    }

    #[test]
    fn test_premium_rounds_to_cent() {
        // 12345.67 * 0.01 = 123.4567
        let lmi = calculate_lmi(Money::from_cents(1_234_567), dec!(82));
        assert_eq!(lmi.cents(), 12_346);
    }

    #[test]
    fn test_table_validation() {
        assert!(LmiTable::default().validate().is_ok());

        let empty = LmiTable { threshold: dec!(80), bands: vec![] };
        assert!(empty.validate().is_err());

        let closed = LmiTable {
            threshold: dec!(80),
            bands: vec![LmiBand { max_lvr: Some(dec!(90)), premium_rate: dec!(0.02) }],
        };
        assert!(closed.validate().is_err());

        let unsorted = LmiTable {
            threshold: dec!(80),
            bands: vec![
                LmiBand { max_lvr: Some(dec!(90)), premium_rate: dec!(0.02) },
                LmiBand { max_lvr: Some(dec!(85)), premium_rate: dec!(0.01) },
                LmiBand { max_lvr: None, premium_rate: dec!(0.04) },
            ],
        };
        assert!(unsorted.validate().is_err());
    }
}
