use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::repayments::{RepaymentCalculator, MONTHS_PER_YEAR};

/// one month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub month: u32,
    pub opening_balance: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_payment: Money,
    pub closing_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// one year of schedule rows rolled up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_payment: Money,
    pub closing_balance: Money,
    pub cumulative_principal: Money,
    pub cumulative_interest: Money,
}

/// month-ordered schedule rows; empty when a schedule does not apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AmortizationSchedule {
    entries: Vec<AmortizationEntry>,
}

impl AmortizationSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[AmortizationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AmortizationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// row for a 1-based month
    pub fn get(&self, month: u32) -> Option<&AmortizationEntry> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.entries.get(index)
    }

    pub fn first(&self) -> Option<&AmortizationEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&AmortizationEntry> {
        self.entries.last()
    }

    pub fn total_interest(&self) -> Money {
        self.last().map(|e| e.cumulative_interest).unwrap_or(Money::ZERO)
    }

    pub fn total_principal(&self) -> Money {
        self.last().map(|e| e.cumulative_principal).unwrap_or(Money::ZERO)
    }

    pub fn total_paid(&self) -> Money {
        self.entries
            .iter()
            .fold(Money::ZERO, |acc, e| acc + e.total_payment)
    }

    /// balance remaining after a 1-based month, the opening principal for month 0
    pub fn balance_after(&self, month: u32) -> Money {
        if month == 0 {
            return self.first().map(|e| e.opening_balance).unwrap_or(Money::ZERO);
        }
        self.get(month)
            .or_else(|| self.last())
            .map(|e| e.closing_balance)
            .unwrap_or(Money::ZERO)
    }

    /// rows grouped by 12, with year-end balances
    pub fn yearly_summary(&self) -> Vec<YearlySummary> {
        self.entries
            .chunks(MONTHS_PER_YEAR as usize)
            .zip(1..)
            .filter_map(|(rows, year)| {
                let year_end = rows.last()?;
                Some(YearlySummary {
                    year,
                    principal_paid: rows.iter().fold(Money::ZERO, |acc, e| acc + e.principal_paid),
                    interest_paid: rows.iter().fold(Money::ZERO, |acc, e| acc + e.interest_paid),
                    total_payment: rows.iter().fold(Money::ZERO, |acc, e| acc + e.total_payment),
                    closing_balance: year_end.closing_balance,
                    cumulative_principal: year_end.cumulative_principal,
                    cumulative_interest: year_end.cumulative_interest,
                })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = &'a AmortizationEntry;
    type IntoIter = std::slice::Iter<'a, AmortizationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl RepaymentCalculator {
    /// month-by-month ledger of a P&I loan
    ///
    /// amortizes the offset-reduced balance at the fixed payment from
    /// `principal_and_interest`. every row pays that payment; the closing
    /// balance is floored at zero and the rows stop once it is reached
    pub fn amortization_schedule(
        &self,
        loan_amount: Money,
        interest_rate: Rate,
        term_years: u32,
        offset_balance: Money,
    ) -> AmortizationSchedule {
        let effective_loan = loan_amount - offset_balance;
        if !effective_loan.is_positive() {
            return AmortizationSchedule::empty();
        }

        let repayment =
            self.principal_and_interest(loan_amount, interest_rate, term_years, offset_balance);
        let months = term_years.saturating_mul(MONTHS_PER_YEAR);

        let mut ledger = Ledger::new(effective_loan);
        self.amortize(&mut ledger, interest_rate, months, repayment.monthly_payment);

        tracing::trace!(
            months = ledger.entries.len(),
            payment = repayment.monthly_payment.cents(),
            "generated amortization schedule"
        );
        ledger.into_schedule()
    }

    /// interest-only rows followed by the P&I amortization of the remaining term
    pub fn blended_schedule(
        &self,
        loan_amount: Money,
        interest_rate: Rate,
        term_years: u32,
        interest_only_years: u32,
        offset_balance: Money,
    ) -> AmortizationSchedule {
        let effective_loan = loan_amount - offset_balance;
        if !effective_loan.is_positive() {
            return AmortizationSchedule::empty();
        }

        let io_years = interest_only_years.min(term_years);
        let io_months = io_years.saturating_mul(MONTHS_PER_YEAR);
        let pi_months = (term_years - io_years).saturating_mul(MONTHS_PER_YEAR);

        let mut ledger = Ledger::new(effective_loan);
        let io_payment = self.monthly_interest(effective_loan, interest_rate);
        for _ in 0..io_months {
            ledger.record(io_payment, Money::ZERO, io_payment);
        }

        let pi_payment = self.level_payment(effective_loan, interest_rate, pi_months);
        self.amortize(&mut ledger, interest_rate, pi_months, pi_payment);

        tracing::trace!(
            io_months,
            pi_months,
            io_payment = io_payment.cents(),
            pi_payment = pi_payment.cents(),
            "generated blended schedule"
        );
        ledger.into_schedule()
    }

    fn amortize(&self, ledger: &mut Ledger, interest_rate: Rate, months: u32, payment: Money) {
        for _ in 0..months {
            let interest = self.monthly_interest(ledger.balance, interest_rate);
            ledger.record(payment, payment - interest, interest);
            if !ledger.balance.is_positive() {
                break;
            }
        }

        if months > 0 && !ledger.balance.is_zero() {
            tracing::debug!(
                rows = ledger.entries.len(),
                residual = ledger.balance.cents(),
                "schedule ended with a rounding residual"
            );
        }
    }
}

/// running balances while rows are appended
struct Ledger {
    /// unfloored, so an overpaid final row leaves it negative
    balance: Money,
    next_month: u32,
    cumulative_interest: Money,
    cumulative_principal: Money,
    entries: Vec<AmortizationEntry>,
}

impl Ledger {
    fn new(principal: Money) -> Self {
        Self {
            balance: principal,
            next_month: 1,
            cumulative_interest: Money::ZERO,
            cumulative_principal: Money::ZERO,
            entries: Vec::new(),
        }
    }

    fn record(&mut self, total_payment: Money, principal_paid: Money, interest_paid: Money) {
        let opening_balance = self.balance;
        self.balance = opening_balance - principal_paid;
        self.cumulative_interest += interest_paid;
        self.cumulative_principal += principal_paid;

        self.entries.push(AmortizationEntry {
            month: self.next_month,
            opening_balance,
            principal_paid,
            interest_paid,
            total_payment,
            closing_balance: self.balance.max(Money::ZERO),
            cumulative_interest: self.cumulative_interest,
            cumulative_principal: self.cumulative_principal,
        });
        self.next_month += 1;
    }

    fn into_schedule(self) -> AmortizationSchedule {
        AmortizationSchedule {
            entries: self.entries,
        }
    }
}

/// amortization schedule with the default decimal context
pub fn generate_amortization_schedule(
    loan_amount: Money,
    interest_rate: Rate,
    term_years: u32,
    offset_balance: Money,
) -> AmortizationSchedule {
    RepaymentCalculator::default().amortization_schedule(
        loan_amount,
        interest_rate,
        term_years,
        offset_balance,
    )
}

/// interest-only then P&I schedule with the default decimal context
pub fn generate_blended_schedule(
    loan_amount: Money,
    interest_rate: Rate,
    term_years: u32,
    interest_only_years: u32,
    offset_balance: Money,
) -> AmortizationSchedule {
    RepaymentCalculator::default().blended_schedule(
        loan_amount,
        interest_rate,
        term_years,
        interest_only_years,
        offset_balance,
    )
}
