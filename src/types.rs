use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// how the loan is repaid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentType {
    /// every payment reduces the outstanding balance
    #[default]
    PrincipalAndInterest,
    /// payments cover interest only, optionally reverting to P&I after a period
    InterestOnly,
}

impl RepaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentType::PrincipalAndInterest => "principal_and_interest",
            RepaymentType::InterestOnly => "interest_only",
        }
    }
}

impl fmt::Display for RepaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// user-editable loan input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    PurchasePrice,
    Deposit,
    InterestRate,
    LoanTermYears,
    RepaymentType,
    InterestOnlyPeriodYears,
    OffsetAccountBalance,
}

impl InputField {
    pub const ALL: [InputField; 7] = [
        InputField::PurchasePrice,
        InputField::Deposit,
        InputField::InterestRate,
        InputField::LoanTermYears,
        InputField::RepaymentType,
        InputField::InterestOnlyPeriodYears,
        InputField::OffsetAccountBalance,
    ];

    /// field key as exposed to the presentation layer
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::PurchasePrice => "purchasePrice",
            InputField::Deposit => "deposit",
            InputField::InterestRate => "interestRate",
            InputField::LoanTermYears => "loanTermYears",
            InputField::RepaymentType => "repaymentType",
            InputField::InterestOnlyPeriodYears => "interestOnlyPeriodYears",
            InputField::OffsetAccountBalance => "offsetAccountBalance",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// rounding applied when a decimal is reduced to fewer digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// ties away from zero
    #[default]
    HalfUp,
    /// ties to even (banker's rounding)
    HalfEven,
    /// truncate toward zero
    Down,
    /// away from zero
    Up,
}

impl RoundingMode {
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys_are_camel_case() {
        assert_eq!(InputField::PurchasePrice.to_string(), "purchasePrice");
        assert_eq!(InputField::InterestOnlyPeriodYears.as_str(), "interestOnlyPeriodYears");
        let json = serde_json::to_string(&InputField::OffsetAccountBalance).unwrap();
        assert_eq!(json, "\"offsetAccountBalance\"");
    }

    #[test]
    fn test_repayment_type_serde() {
        let json = serde_json::to_string(&RepaymentType::InterestOnly).unwrap();
        assert_eq!(json, "\"interest_only\"");
        let parsed: RepaymentType = serde_json::from_str("\"principal_and_interest\"").unwrap();
        assert_eq!(parsed, RepaymentType::PrincipalAndInterest);
    }
}
