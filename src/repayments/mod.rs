pub mod amortization;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{DecimalContext, Money, Rate};

pub use amortization::{
    generate_amortization_schedule, generate_blended_schedule, AmortizationEntry,
    AmortizationSchedule, YearlySummary,
};

pub(crate) const MONTHS_PER_YEAR: u32 = 12;

/// principal and interest repayment figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RepaymentBreakdown {
    pub monthly_payment: Money,
    /// principal share of the first payment
    pub principal_portion: Money,
    /// interest share of the first payment
    pub interest_portion: Money,
    pub annual_payment: Money,
}

/// interest-only repayment figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InterestOnlyRepayment {
    pub monthly_payment: Money,
    pub annual_payment: Money,
}

/// repayment calculator bound to one decimal context
#[derive(Debug, Clone, Copy, Default)]
pub struct RepaymentCalculator {
    ctx: DecimalContext,
}

impl RepaymentCalculator {
    pub fn new(ctx: DecimalContext) -> Self {
        Self { ctx }
    }

    /// level monthly payment that retires the offset-reduced loan over the term
    ///
    /// M = P * r * (1 + r)^n / ((1 + r)^n - 1), or P / n at a zero rate
    pub fn principal_and_interest(
        &self,
        loan_amount: Money,
        interest_rate: Rate,
        term_years: u32,
        offset_balance: Money,
    ) -> RepaymentBreakdown {
        let effective_loan = loan_amount - offset_balance;
        if !effective_loan.is_positive() {
            return RepaymentBreakdown::default();
        }

        let months = term_years.saturating_mul(MONTHS_PER_YEAR);
        let monthly_payment = self.level_payment(effective_loan, interest_rate, months);
        let interest_portion = self.monthly_interest(effective_loan, interest_rate);

        RepaymentBreakdown {
            monthly_payment,
            principal_portion: monthly_payment - interest_portion,
            interest_portion,
            annual_payment: monthly_payment * MONTHS_PER_YEAR as i64,
        }
    }

    /// payment covering one month of interest on the offset-reduced loan
    pub fn interest_only(
        &self,
        loan_amount: Money,
        interest_rate: Rate,
        offset_balance: Money,
    ) -> InterestOnlyRepayment {
        let effective_loan = loan_amount - offset_balance;
        if !effective_loan.is_positive() {
            return InterestOnlyRepayment::default();
        }

        let monthly_payment = self.monthly_interest(effective_loan, interest_rate);
        InterestOnlyRepayment {
            monthly_payment,
            annual_payment: monthly_payment * MONTHS_PER_YEAR as i64,
        }
    }

    /// round(balance * annual rate / 12)
    pub fn monthly_interest(&self, balance: Money, interest_rate: Rate) -> Money {
        self.ctx
            .round_money(balance.as_decimal() * interest_rate.monthly(&self.ctx))
    }

    pub(crate) fn level_payment(&self, principal: Money, interest_rate: Rate, months: u32) -> Money {
        // nothing left to spread over
        if months == 0 {
            return principal;
        }

        let monthly_rate = interest_rate.monthly(&self.ctx);
        let growth = self.ctx.powu(Decimal::ONE + monthly_rate, months);
        let denominator = growth - Decimal::ONE;

        let payment = if denominator > Decimal::ZERO {
            let ratio = self.ctx.div(growth, denominator);
            principal.as_decimal() * monthly_rate * ratio
        } else {
            self.ctx.div(principal.as_decimal(), Decimal::from(months))
        };
        self.ctx.round_money(payment)
    }
}

/// P&I repayment with the default decimal context
pub fn calculate_principal_and_interest_repayment(
    loan_amount: Money,
    interest_rate: Rate,
    term_years: u32,
    offset_balance: Money,
) -> RepaymentBreakdown {
    RepaymentCalculator::default().principal_and_interest(
        loan_amount,
        interest_rate,
        term_years,
        offset_balance,
    )
}

/// interest-only repayment with the default decimal context
pub fn calculate_interest_only_repayment(
    loan_amount: Money,
    interest_rate: Rate,
    offset_balance: Money,
) -> InterestOnlyRepayment {
    RepaymentCalculator::default().interest_only(loan_amount, interest_rate, offset_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoundingMode;

    #[test]
    fn test_principal_and_interest_repayment() {
        let repayment = calculate_principal_and_interest_repayment(
            Money::from_dollars_whole(520_000),
            Rate::from_bps(625),
            30,
            Money::ZERO,
        );
        assert_eq!(repayment.monthly_payment.cents(), 320_173);
        assert_eq!(repayment.interest_portion.cents(), 270_833);
        assert_eq!(repayment.principal_portion.cents(), 49_340);
        assert_eq!(repayment.annual_payment.cents(), 3_842_076);
    }

    #[test]
    fn test_short_loan_repayment() {
        let repayment = calculate_principal_and_interest_repayment(
            Money::from_dollars_whole(100_000),
            Rate::from_bps(1200),
            1,
            Money::ZERO,
        );
        assert_eq!(repayment.monthly_payment.cents(), 888_488);
        assert_eq!(repayment.interest_portion.cents(), 100_000);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let repayment = calculate_principal_and_interest_repayment(
            Money::from_dollars_whole(120_000),
            Rate::ZERO,
            10,
            Money::ZERO,
        );
        assert_eq!(repayment.monthly_payment, Money::from_dollars_whole(1_000));
        assert_eq!(repayment.interest_portion, Money::ZERO);
        assert_eq!(repayment.principal_portion, Money::from_dollars_whole(1_000));
    }

    #[test]
    fn test_offset_reduces_repayment() {
        let repayment = calculate_principal_and_interest_repayment(
            Money::from_dollars_whole(520_000),
            Rate::from_bps(625),
            30,
            Money::from_dollars_whole(100_000),
        );
        assert_eq!(repayment.monthly_payment.cents(), 258_601);
        assert_eq!(repayment.interest_portion.cents(), 218_750);
    }

    #[test]
    fn test_full_offset_silences_repayments() {
        let loan = Money::from_dollars_whole(400_000);
        let pi = calculate_principal_and_interest_repayment(loan, Rate::from_bps(600), 30, loan);
        assert_eq!(pi, RepaymentBreakdown::default());

        let io = calculate_interest_only_repayment(loan, Rate::from_bps(600), loan + Money::from_cents(1));
        assert_eq!(io, InterestOnlyRepayment::default());
    }

    #[test]
    fn test_interest_only_repayment() {
        let io = calculate_interest_only_repayment(
            Money::from_dollars_whole(400_000),
            Rate::from_bps(600),
            Money::ZERO,
        );
        assert_eq!(io.monthly_payment, Money::from_dollars_whole(2_000));
        assert_eq!(io.annual_payment, Money::from_dollars_whole(24_000));
    }

    #[test]
    fn test_zero_months_is_due_at_once() {
        let calc = RepaymentCalculator::default();
        let repayment = calc.principal_and_interest(
            Money::from_dollars_whole(10_000),
            Rate::from_bps(500),
            0,
            Money::ZERO,
        );
        assert_eq!(repayment.monthly_payment, Money::from_dollars_whole(10_000));
    }

    #[test]
    fn test_extreme_rate_does_not_overflow() {
        // growth saturates, leaving the payment at one month of interest
        let calc = RepaymentCalculator::default();
        let loan = Money::from_dollars_whole(1_000);
        let rate = Rate::from_bps(1_000_000);
        let repayment = calc.principal_and_interest(loan, rate, 40, Money::ZERO);
        assert_eq!(repayment.monthly_payment.cents(), 833_333);
        assert_eq!(repayment.monthly_payment, calc.monthly_interest(loan, rate));
    }

    #[test]
    fn test_context_rounding_is_honoured() {
        let half_up = RepaymentCalculator::new(DecimalContext::default());
        let half_even = RepaymentCalculator::new(DecimalContext::new(20, RoundingMode::HalfEven).unwrap());
        // 50 cents at 12% p.a. is exactly half a cent per month
        let balance = Money::from_cents(50);
        let rate = Rate::from_bps(1200);
        assert_eq!(half_up.monthly_interest(balance, rate).cents(), 1);
        assert_eq!(half_even.monthly_interest(balance, rate).cents(), 0);
    }
}
