use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::InputField;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MortgageError {
    #[error("invalid loan inputs: {errors}")]
    InvalidInputs {
        errors: ValidationErrors,
    },

    #[error("invalid currency amount: {input:?}")]
    InvalidCurrency {
        input: String,
    },

    #[error("invalid percentage: {input:?}")]
    InvalidPercentage {
        input: String,
    },

    #[error("amount out of range: {value}")]
    AmountOutOfRange {
        value: Decimal,
    },

    #[error("property value must be positive: {value}")]
    InvalidPropertyValue {
        value: Money,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, MortgageError>;

/// a single field constraint violation, displayed as the message shown to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Purchase price must be greater than $0")]
    PurchasePriceNotPositive,

    #[error("Deposit must be between $0 and purchase price")]
    DepositOutOfRange,

    #[error("Interest rate must be between 0% and {max_percent}%")]
    InterestRateOutOfRange {
        max_percent: Decimal,
    },

    #[error("Loan term must be between {min} and {max} years")]
    LoanTermOutOfRange {
        min: u32,
        max: u32,
    },

    #[error("Interest-only period cannot exceed the loan term")]
    InterestOnlyPeriodTooLong,

    #[error("Offset balance cannot be negative")]
    OffsetBalanceNegative,

    #[error("{input:?} is not a valid value")]
    Unparseable {
        input: String,
    },

    #[error("Unable to calculate: {message}")]
    CalculationFailed {
        message: String,
    },
}

/// every violated constraint, keyed by field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(BTreeMap<InputField, ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// record a violation; the first one recorded for a field wins
    pub fn add(&mut self, field: InputField, error: ValidationError) {
        self.0.entry(field).or_insert(error);
    }

    /// record a violation, overwriting any earlier one for the field
    pub fn replace(&mut self, field: InputField, error: ValidationError) {
        self.0.insert(field, error);
    }

    pub fn remove(&mut self, field: InputField) -> Option<ValidationError> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: InputField) -> Option<&ValidationError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: InputField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> Vec<InputField> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InputField, &ValidationError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    /// field key -> message, as handed to the presentation layer
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(field, error)| (field.as_str().to_string(), error.to_string()))
            .collect()
    }

    /// merge another set, keeping existing entries
    pub fn extend(&mut self, other: ValidationErrors) {
        for (field, error) in other.0 {
            self.add(field, error);
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(MortgageError::InvalidInputs { errors: self })
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, error) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, error)?;
            first = false;
        }
        Ok(())
    }
}
