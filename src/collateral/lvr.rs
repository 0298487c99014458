use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::collateral::lmi::LmiTable;
use crate::decimal::{DecimalContext, Money};
use crate::errors::{MortgageError, Result};

/// lvr figures for one loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LvrAssessment {
    /// percent, rounded to 2 decimal places
    pub lvr: Decimal,
    pub requires_lmi: bool,
    pub estimated_lmi: Option<Money>,
}

/// lvr calculator for property-secured loans
pub struct LvrCalculator<'a> {
    ctx: &'a DecimalContext,
    lmi: &'a LmiTable,
}

impl<'a> LvrCalculator<'a> {
    pub fn new(ctx: &'a DecimalContext, lmi: &'a LmiTable) -> Self {
        Self { ctx, lmi }
    }

    /// loan / property value * 100, at context precision
    pub fn calculate_lvr(&self, loan_amount: Money, property_value: Money) -> Result<Decimal> {
        if !property_value.is_positive() {
            return Err(MortgageError::InvalidPropertyValue {
                value: property_value,
            });
        }
        Ok(self.ctx.normalize(
            self.ctx.div(loan_amount.as_decimal(), property_value.as_decimal()) * dec!(100),
        ))
    }

    /// lvr, lmi requirement and premium estimate
    ///
    /// the lmi decision uses the unrounded lvr, so a loan a hair over the
    /// threshold still attracts lmi even though it displays as 80.00
    pub fn assess(&self, loan_amount: Money, property_value: Money) -> Result<LvrAssessment> {
        let lvr = self.calculate_lvr(loan_amount, property_value)?;
        let requires_lmi = self.lmi.applies(lvr);
        let estimated_lmi = requires_lmi.then(|| self.lmi.estimate(loan_amount, lvr, self.ctx));

        Ok(LvrAssessment {
            lvr: self.ctx.round_dp(lvr, 2),
            requires_lmi,
            estimated_lmi,
        })
    }
}

/// lvr percent rounded to 2 decimal places, with the default context
pub fn calculate_lvr(loan_amount: Money, property_value: Money) -> Result<Decimal> {
    let ctx = DecimalContext::default();
    let lmi = LmiTable::default();
    let lvr = LvrCalculator::new(&ctx, &lmi).calculate_lvr(loan_amount, property_value)?;
    Ok(ctx.round_dp(lvr, 2))
}
