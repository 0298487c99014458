use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::collateral::LvrCalculator;
use crate::config::{CalculatorConfig, InputLimits};
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ValidationError, ValidationErrors};
use crate::repayments::{RepaymentCalculator, MONTHS_PER_YEAR};
use crate::types::{InputField, RepaymentType};

/// caller-owned loan terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInputs {
    pub purchase_price: Money,
    pub deposit: Money,
    pub interest_rate: Rate,
    pub loan_term_years: u32,
    pub repayment_type: RepaymentType,
    /// only meaningful for interest-only loans; `None` means no IO period was given
    pub interest_only_period_years: Option<u32>,
    pub offset_account_balance: Money,
}

impl LoanInputs {
    pub fn loan_amount(&self) -> Money {
        self.purchase_price - self.deposit
    }

    /// IO years when the loan reverts to P&I within its term
    pub fn blended_period(&self) -> Option<u32> {
        match (self.repayment_type, self.interest_only_period_years) {
            (RepaymentType::InterestOnly, Some(years)) if years > 0 && years < self.loan_term_years => {
                Some(years)
            }
            _ => None,
        }
    }

    /// check every constraint; all violations are reported together
    pub fn validate(&self, limits: &InputLimits) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if !self.purchase_price.is_positive() {
            errors.add(InputField::PurchasePrice, ValidationError::PurchasePriceNotPositive);
        }

        if self.deposit.is_negative() || self.deposit >= self.purchase_price {
            errors.add(InputField::Deposit, ValidationError::DepositOutOfRange);
        }

        let rate = self.interest_rate.bps();
        if rate < 0 || rate > limits.max_interest_rate_bps {
            errors.add(
                InputField::InterestRate,
                ValidationError::InterestRateOutOfRange {
                    max_percent: limits.max_interest_percent(),
                },
            );
        }

        if self.loan_term_years < limits.min_term_years || self.loan_term_years > limits.max_term_years {
            errors.add(
                InputField::LoanTermYears,
                ValidationError::LoanTermOutOfRange {
                    min: limits.min_term_years,
                    max: limits.max_term_years,
                },
            );
        }

        if let Some(years) = self.interest_only_period_years {
            if years > self.loan_term_years {
                errors.add(
                    InputField::InterestOnlyPeriodYears,
                    ValidationError::InterestOnlyPeriodTooLong,
                );
            }
        }

        if self.offset_account_balance.is_negative() {
            errors.add(InputField::OffsetAccountBalance, ValidationError::OffsetBalanceNegative);
        }

        errors
    }
}

/// derived loan figures for one set of valid inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageResult {
    pub repayment_type: RepaymentType,
    pub loan_amount: Money,
    /// loan less offset balance, floored at zero
    pub effective_loan_amount: Money,
    /// percent, 2 decimal places
    pub lvr: Decimal,
    /// current payment; the IO payment during an IO period
    pub monthly_repayment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// total repayments less the loan amount; zero at a zero rate
    pub total_interest: Money,
    pub total_repayments: Money,
    pub requires_lmi: bool,
    pub estimated_lmi: Option<Money>,
    /// P&I payment once a blended IO period ends
    pub reverting_repayment: Option<Money>,
}

/// calculate with the default configuration
pub fn calculate_mortgage(inputs: &LoanInputs) -> Result<MortgageResult> {
    calculate_mortgage_with(inputs, &CalculatorConfig::default())
}

/// validate then derive repayments, totals, lvr and lmi
pub fn calculate_mortgage_with(inputs: &LoanInputs, config: &CalculatorConfig) -> Result<MortgageResult> {
    inputs.validate(&config.limits).into_result()?;

    let ctx = &config.decimal;
    let calc = RepaymentCalculator::new(*ctx);

    let loan_amount = inputs.loan_amount();
    let assessment = LvrCalculator::new(ctx, &config.lmi).assess(loan_amount, inputs.purchase_price)?;

    let rate = inputs.interest_rate;
    let term = inputs.loan_term_years;
    let offset = inputs.offset_account_balance;
    let effective_loan = (loan_amount - offset).max(Money::ZERO);
    let total_months = months(term);

    // repayments beyond the borrowed amount; an offset can push this below zero
    let interest_over = |repaid: Money| {
        if rate.is_zero() {
            Money::ZERO
        } else {
            repaid - loan_amount
        }
    };

    let result = match (inputs.repayment_type, inputs.blended_period()) {
        (RepaymentType::PrincipalAndInterest, _) => {
            let repayment = calc.principal_and_interest(loan_amount, rate, term, offset);
            let total_repayments = repayment.monthly_payment * total_months;
            MortgageResult {
                repayment_type: inputs.repayment_type,
                loan_amount,
                effective_loan_amount: effective_loan,
                lvr: assessment.lvr,
                monthly_repayment: repayment.monthly_payment,
                principal_portion: repayment.principal_portion,
                interest_portion: repayment.interest_portion,
                total_interest: interest_over(total_repayments),
                total_repayments,
                requires_lmi: assessment.requires_lmi,
                estimated_lmi: assessment.estimated_lmi,
                reverting_repayment: None,
            }
        }
        (RepaymentType::InterestOnly, Some(io_years)) => {
            let io = calc.interest_only(loan_amount, rate, offset);
            let pi = calc.principal_and_interest(loan_amount, rate, term - io_years, offset);
            let io_total = io.monthly_payment * months(io_years);
            let pi_total = pi.monthly_payment * months(term - io_years);
            MortgageResult {
                repayment_type: inputs.repayment_type,
                loan_amount,
                effective_loan_amount: effective_loan,
                lvr: assessment.lvr,
                monthly_repayment: io.monthly_payment,
                principal_portion: Money::ZERO,
                interest_portion: io.monthly_payment,
                total_interest: io_total + interest_over(pi_total),
                total_repayments: io_total + pi_total,
                requires_lmi: assessment.requires_lmi,
                estimated_lmi: assessment.estimated_lmi,
                reverting_repayment: Some(pi.monthly_payment),
            }
        }
        (RepaymentType::InterestOnly, None) => {
            let io = calc.interest_only(loan_amount, rate, offset);
            let total = io.monthly_payment * total_months;
            MortgageResult {
                repayment_type: inputs.repayment_type,
                loan_amount,
                effective_loan_amount: effective_loan,
                lvr: assessment.lvr,
                monthly_repayment: io.monthly_payment,
                principal_portion: Money::ZERO,
                interest_portion: io.monthly_payment,
                total_interest: total,
                total_repayments: total,
                requires_lmi: assessment.requires_lmi,
                estimated_lmi: assessment.estimated_lmi,
                reverting_repayment: None,
            }
        }
    };

    tracing::debug!(
        repayment_type = %result.repayment_type,
        loan = result.loan_amount.cents(),
        monthly = result.monthly_repayment.cents(),
        lvr = %result.lvr,
        "calculated mortgage"
    );
    Ok(result)
}

fn months(years: u32) -> i64 {
    i64::from(years) * i64::from(MONTHS_PER_YEAR)
}
