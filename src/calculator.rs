use serde::{Deserialize, Serialize};

use crate::config::CalculatorConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result, ValidationError, ValidationErrors};
use crate::events::{CalculatorEvent, EventStore};
use crate::mortgage::{calculate_mortgage_with, LoanInputs, MortgageResult};
use crate::parsing::{parse_currency_input, parse_percentage_input, parse_repayment_type, parse_years_input};
use crate::repayments::{AmortizationSchedule, RepaymentCalculator};
use crate::types::{InputField, RepaymentType};

/// a single field change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputUpdate {
    PurchasePrice(Money),
    Deposit(Money),
    InterestRate(Rate),
    LoanTermYears(u32),
    RepaymentType(RepaymentType),
    InterestOnlyPeriodYears(Option<u32>),
    OffsetAccountBalance(Money),
}

impl InputUpdate {
    pub fn field(&self) -> InputField {
        match self {
            InputUpdate::PurchasePrice(_) => InputField::PurchasePrice,
            InputUpdate::Deposit(_) => InputField::Deposit,
            InputUpdate::InterestRate(_) => InputField::InterestRate,
            InputUpdate::LoanTermYears(_) => InputField::LoanTermYears,
            InputUpdate::RepaymentType(_) => InputField::RepaymentType,
            InputUpdate::InterestOnlyPeriodYears(_) => InputField::InterestOnlyPeriodYears,
            InputUpdate::OffsetAccountBalance(_) => InputField::OffsetAccountBalance,
        }
    }

    fn apply(self, inputs: &mut LoanInputs) {
        match self {
            InputUpdate::PurchasePrice(v) => inputs.purchase_price = v,
            InputUpdate::Deposit(v) => inputs.deposit = v,
            InputUpdate::InterestRate(v) => inputs.interest_rate = v,
            InputUpdate::LoanTermYears(v) => inputs.loan_term_years = v,
            InputUpdate::RepaymentType(v) => inputs.repayment_type = v,
            InputUpdate::InterestOnlyPeriodYears(v) => inputs.interest_only_period_years = v,
            InputUpdate::OffsetAccountBalance(v) => inputs.offset_account_balance = v,
        }
    }

    /// parse form text for a field; `None` when the text is malformed
    pub fn parse(field: InputField, text: &str) -> Option<Self> {
        match field {
            InputField::PurchasePrice => parse_currency_input(text).map(InputUpdate::PurchasePrice),
            InputField::Deposit => parse_currency_input(text).map(InputUpdate::Deposit),
            InputField::InterestRate => parse_percentage_input(text).map(InputUpdate::InterestRate),
            InputField::LoanTermYears => parse_years_input(text).map(InputUpdate::LoanTermYears),
            InputField::RepaymentType => parse_repayment_type(text).map(InputUpdate::RepaymentType),
            // a blank IO period clears it
            InputField::InterestOnlyPeriodYears if text.trim().is_empty() => {
                Some(InputUpdate::InterestOnlyPeriodYears(None))
            }
            InputField::InterestOnlyPeriodYears => {
                parse_years_input(text).map(|years| InputUpdate::InterestOnlyPeriodYears(Some(years)))
            }
            InputField::OffsetAccountBalance => {
                parse_currency_input(text).map(InputUpdate::OffsetAccountBalance)
            }
        }
    }
}

/// outputs for the current inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationOutcome {
    Valid {
        result: MortgageResult,
        /// empty when a schedule does not apply, e.g. interest-only loans
        schedule: AmortizationSchedule,
    },
    Invalid {
        errors: ValidationErrors,
    },
}

impl CalculationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, CalculationOutcome::Valid { .. })
    }

    pub fn result(&self) -> Option<&MortgageResult> {
        match self {
            CalculationOutcome::Valid { result, .. } => Some(result),
            CalculationOutcome::Invalid { .. } => None,
        }
    }

    pub fn schedule(&self) -> Option<&AmortizationSchedule> {
        match self {
            CalculationOutcome::Valid { schedule, .. } => Some(schedule),
            CalculationOutcome::Invalid { .. } => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            CalculationOutcome::Valid { .. } => None,
            CalculationOutcome::Invalid { errors } => Some(errors),
        }
    }
}

/// mortgage calculator driven by a single owner
///
/// always either valid, holding the result and schedule for the current
/// inputs, or invalid, holding every violated constraint. each mutation
/// re-validates and re-derives before it returns
#[derive(Debug, Clone)]
pub struct MortgageCalculator {
    config: CalculatorConfig,
    inputs: LoanInputs,
    /// fields whose last text update did not parse
    parse_errors: ValidationErrors,
    outcome: CalculationOutcome,
    events: EventStore,
}

impl MortgageCalculator {
    /// create a calculator holding the configured default inputs
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        let inputs = config.defaults;
        Ok(Self::build(config, inputs))
    }

    /// create a calculator holding caller-supplied inputs
    pub fn with_inputs(config: CalculatorConfig, inputs: LoanInputs) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, inputs))
    }

    fn build(config: CalculatorConfig, inputs: LoanInputs) -> Self {
        let mut events = EventStore::new();
        events.emit(CalculatorEvent::CalculatorOpened);

        let mut calculator = Self {
            config,
            inputs,
            parse_errors: ValidationErrors::new(),
            outcome: CalculationOutcome::Invalid {
                errors: ValidationErrors::new(),
            },
            events,
        };
        calculator.revalidate_and_recompute();
        calculator
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn inputs(&self) -> &LoanInputs {
        &self.inputs
    }

    /// apply one field change and re-derive
    pub fn update(&mut self, update: InputUpdate) -> &CalculationOutcome {
        let field = update.field();
        update.apply(&mut self.inputs);
        self.parse_errors.remove(field);
        self.events.emit(CalculatorEvent::InputChanged { field });
        self.revalidate_and_recompute()
    }

    /// parse form text into a field and re-derive
    ///
    /// malformed text leaves the stored value alone and marks the field invalid
    /// until it is next set successfully
    pub fn update_from_text(&mut self, field: InputField, text: &str) -> &CalculationOutcome {
        match InputUpdate::parse(field, text) {
            Some(update) => self.update(update),
            None => {
                tracing::debug!(%field, input = text, "rejected unparseable input");
                self.parse_errors.replace(
                    field,
                    ValidationError::Unparseable {
                        input: text.to_string(),
                    },
                );
                self.events.emit(CalculatorEvent::InputRejected {
                    field,
                    input: text.to_string(),
                });
                self.revalidate_and_recompute()
            }
        }
    }

    /// replace every input at once
    pub fn set_inputs(&mut self, inputs: LoanInputs) -> &CalculationOutcome {
        for field in changed_fields(&self.inputs, &inputs) {
            self.events.emit(CalculatorEvent::InputChanged { field });
        }
        self.inputs = inputs;
        self.parse_errors = ValidationErrors::new();
        self.revalidate_and_recompute()
    }

    /// restore the configured defaults and clear errors
    pub fn reset(&mut self) -> &CalculationOutcome {
        self.inputs = self.config.defaults;
        self.parse_errors = ValidationErrors::new();
        self.events.emit(CalculatorEvent::CalculatorReset);
        self.revalidate_and_recompute()
    }

    /// validate the current inputs and derive result and schedule when valid
    pub fn revalidate_and_recompute(&mut self) -> &CalculationOutcome {
        let mut errors = self.parse_errors.clone();
        errors.extend(self.inputs.validate(&self.config.limits));

        self.outcome = if errors.is_empty() {
            self.derive()
        } else {
            CalculationOutcome::Invalid { errors }
        };

        match &self.outcome {
            CalculationOutcome::Valid { result, schedule } => {
                tracing::debug!(
                    monthly = result.monthly_repayment.cents(),
                    rows = schedule.len(),
                    "inputs valid, outputs derived"
                );
                self.events.emit(CalculatorEvent::CalculationCompleted {
                    repayment_type: result.repayment_type,
                    loan_amount: result.loan_amount,
                    monthly_repayment: result.monthly_repayment,
                    lvr: result.lvr,
                });
            }
            CalculationOutcome::Invalid { errors } => {
                tracing::debug!(%errors, "inputs invalid, outputs cleared");
                self.events.emit(CalculatorEvent::ValidationFailed {
                    fields: errors.fields(),
                });
            }
        }
        &self.outcome
    }

    fn derive(&self) -> CalculationOutcome {
        let result = match calculate_mortgage_with(&self.inputs, &self.config) {
            Ok(result) => result,
            Err(MortgageError::InvalidInputs { errors }) => {
                return CalculationOutcome::Invalid { errors };
            }
            // lvr derivation is the only other failure and depends on the purchase price
            Err(err) => {
                let mut errors = ValidationErrors::new();
                errors.add(
                    InputField::PurchasePrice,
                    ValidationError::CalculationFailed {
                        message: err.to_string(),
                    },
                );
                return CalculationOutcome::Invalid { errors };
            }
        };

        let schedule = self.derive_schedule();
        CalculationOutcome::Valid { result, schedule }
    }

    fn derive_schedule(&self) -> AmortizationSchedule {
        let calc = RepaymentCalculator::new(self.config.decimal);
        let inputs = &self.inputs;
        match (inputs.repayment_type, inputs.blended_period()) {
            (RepaymentType::PrincipalAndInterest, _) => calc.amortization_schedule(
                inputs.loan_amount(),
                inputs.interest_rate,
                inputs.loan_term_years,
                inputs.offset_account_balance,
            ),
            (RepaymentType::InterestOnly, Some(io_years)) if self.config.stitch_blended_schedule => {
                calc.blended_schedule(
                    inputs.loan_amount(),
                    inputs.interest_rate,
                    inputs.loan_term_years,
                    io_years,
                    inputs.offset_account_balance,
                )
            }
            (RepaymentType::InterestOnly, _) => AmortizationSchedule::empty(),
        }
    }

    pub fn outcome(&self) -> &CalculationOutcome {
        &self.outcome
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid()
    }

    pub fn result(&self) -> Option<&MortgageResult> {
        self.outcome.result()
    }

    pub fn schedule(&self) -> Option<&AmortizationSchedule> {
        self.outcome.schedule()
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.outcome.errors()
    }

    pub fn events(&self) -> &[CalculatorEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<CalculatorEvent> {
        self.events.take_events()
    }
}

impl Default for MortgageCalculator {
    fn default() -> Self {
        let config = CalculatorConfig::default();
        let inputs = config.defaults;
        Self::build(config, inputs)
    }
}

fn changed_fields(old: &LoanInputs, new: &LoanInputs) -> Vec<InputField> {
    InputField::ALL
        .into_iter()
        .filter(|field| match field {
            InputField::PurchasePrice => old.purchase_price != new.purchase_price,
            InputField::Deposit => old.deposit != new.deposit,
            InputField::InterestRate => old.interest_rate != new.interest_rate,
            InputField::LoanTermYears => old.loan_term_years != new.loan_term_years,
            InputField::RepaymentType => old.repayment_type != new.repayment_type,
            InputField::InterestOnlyPeriodYears => {
                old.interest_only_period_years != new.interest_only_period_years
            }
            InputField::OffsetAccountBalance => {
                old.offset_account_balance != new.offset_account_balance
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_valid_with_defaults() {
        let calc = MortgageCalculator::default();
        assert!(calc.is_valid());
        let result = calc.result().unwrap();
        assert_eq!(result.loan_amount, Money::from_dollars_whole(520_000));
        assert_eq!(calc.schedule().unwrap().len(), 360);
        assert!(calc.errors().is_none());
    }

    #[test]
    fn test_invalid_update_clears_outputs() {
        let mut calc = MortgageCalculator::default();
        let outcome = calc.update(InputUpdate::Deposit(Money::from_dollars_whole(700_000)));
        assert!(!outcome.is_valid());
        assert!(calc.result().is_none());
        assert!(calc.schedule().is_none());
        assert_eq!(
            calc.errors().unwrap().get(InputField::Deposit),
            Some(&ValidationError::DepositOutOfRange)
        );

        calc.update(InputUpdate::Deposit(Money::from_dollars_whole(100_000)));
        assert!(calc.is_valid());
        assert_eq!(calc.result().unwrap().loan_amount, Money::from_dollars_whole(550_000));
    }

    #[test]
    fn test_all_violations_reported() {
        let mut calc = MortgageCalculator::default();
        calc.update(InputUpdate::InterestRate(Rate::from_bps(2001)));
        calc.update(InputUpdate::LoanTermYears(41));
        let errors = calc.errors().unwrap();
        assert_eq!(errors.fields(), vec![InputField::InterestRate, InputField::LoanTermYears]);
    }

    #[test]
    fn test_interest_only_has_empty_schedule() {
        let mut calc = MortgageCalculator::default();
        calc.update(InputUpdate::RepaymentType(RepaymentType::InterestOnly));
        assert!(calc.is_valid());
        assert!(calc.schedule().unwrap().is_empty());

        calc.update(InputUpdate::InterestOnlyPeriodYears(Some(5)));
        assert!(calc.schedule().unwrap().is_empty());
        assert_eq!(calc.result().unwrap().reverting_repayment, Some(Money::from_cents(343_028)));
    }

    #[test]
    fn test_stitched_blended_schedule() {
        let config = CalculatorConfig {
            stitch_blended_schedule: true,
            ..CalculatorConfig::default()
        };
        let mut calc = MortgageCalculator::new(config).unwrap();
        calc.update(InputUpdate::RepaymentType(RepaymentType::InterestOnly));
        assert!(calc.schedule().unwrap().is_empty());

        calc.update(InputUpdate::InterestOnlyPeriodYears(Some(5)));
        let schedule = calc.schedule().unwrap();
        assert_eq!(schedule.len(), 360);
        assert_eq!(schedule.get(60).unwrap().principal_paid, Money::ZERO);
        assert!(schedule.get(61).unwrap().principal_paid.is_positive());
    }

    #[test]
    fn test_text_updates() {
        let mut calc = MortgageCalculator::default();
        calc.update_from_text(InputField::PurchasePrice, "$800,000");
        calc.update_from_text(InputField::InterestRate, "5.5%");
        assert!(calc.is_valid());
        assert_eq!(calc.inputs().purchase_price, Money::from_dollars_whole(800_000));
        assert_eq!(calc.inputs().interest_rate, Rate::from_bps(550));

        calc.update_from_text(InputField::Deposit, "lots");
        assert!(!calc.is_valid());
        assert_eq!(calc.inputs().deposit, Money::from_dollars_whole(130_000));
        assert_eq!(
            calc.errors().unwrap().get(InputField::Deposit),
            Some(&ValidationError::Unparseable { input: "lots".to_string() })
        );

        calc.update_from_text(InputField::Deposit, "160000");
        assert!(calc.is_valid());
        assert_eq!(calc.result().unwrap().loan_amount, Money::from_dollars_whole(640_000));
    }

    #[test]
    fn test_blank_io_period_clears_it() {
        let mut calc = MortgageCalculator::default();
        calc.update_from_text(InputField::InterestOnlyPeriodYears, "5");
        assert_eq!(calc.inputs().interest_only_period_years, Some(5));
        calc.update_from_text(InputField::InterestOnlyPeriodYears, "  ");
        assert_eq!(calc.inputs().interest_only_period_years, None);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut calc = MortgageCalculator::default();
        calc.update(InputUpdate::LoanTermYears(0));
        calc.update_from_text(InputField::InterestRate, "abc");
        assert!(!calc.is_valid());

        calc.reset();
        assert!(calc.is_valid());
        assert_eq!(calc.inputs(), &LoanInputs::default());
        assert!(calc.events().contains(&CalculatorEvent::CalculatorReset));
    }

    #[test]
    fn test_set_inputs_reports_changed_fields() {
        let mut calc = MortgageCalculator::default();
        calc.take_events();

        let mut inputs = LoanInputs::default();
        inputs.deposit = Money::from_dollars_whole(200_000);
        inputs.loan_term_years = 25;
        calc.set_inputs(inputs);

        let events = calc.take_events();
        assert_eq!(
            events[..2],
            [
                CalculatorEvent::InputChanged { field: InputField::Deposit },
                CalculatorEvent::InputChanged { field: InputField::LoanTermYears },
            ]
        );
        assert!(matches!(events[2], CalculatorEvent::CalculationCompleted { .. }));
    }

    #[test]
    fn test_usage_events() {
        let mut calc = MortgageCalculator::default();
        calc.update(InputUpdate::LoanTermYears(0));

        let events = calc.take_events();
        assert_eq!(events[0], CalculatorEvent::CalculatorOpened);
        assert!(matches!(events[1], CalculatorEvent::CalculationCompleted { .. }));
        assert_eq!(events[2], CalculatorEvent::InputChanged { field: InputField::LoanTermYears });
        assert_eq!(
            events[3],
            CalculatorEvent::ValidationFailed { fields: vec![InputField::LoanTermYears] }
        );
        assert!(calc.events().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = CalculatorConfig::default();
        config.decimal.precision = 0;
        assert!(MortgageCalculator::new(config).is_err());
    }

    #[test]
    fn test_with_inputs_and_offset_totals() {
        let mut inputs = LoanInputs::default();
        inputs.offset_account_balance = Money::from_dollars_whole(100_000);
        let calc = MortgageCalculator::with_inputs(CalculatorConfig::default(), inputs).unwrap();

        let result = calc.result().unwrap();
        assert_eq!(result.total_interest.cents(), 93_096_360 - 52_000_000);
        let schedule = calc.schedule().unwrap();
        assert_eq!(schedule.first().unwrap().opening_balance, Money::from_dollars_whole(420_000));
        assert!(schedule.iter().all(|e| e.total_payment == result.monthly_repayment));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut calc = MortgageCalculator::default();
        let first = calc.outcome().clone();
        let second = calc.revalidate_and_recompute().clone();
        assert_eq!(first, second);
    }
}
