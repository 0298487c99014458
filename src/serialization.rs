/// serialization support for calculator outcomes
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calculator::{CalculationOutcome, MortgageCalculator};
use crate::decimal::Money;
use crate::repayments::{AmortizationEntry, YearlySummary};
use crate::types::RepaymentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Valid,
    Invalid,
}

/// serializable view of a calculator outcome, as handed to a presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeView {
    pub status: OutcomeStatus,
    pub result: Option<ResultView>,
    pub schedule: Vec<AmortizationEntry>,
    pub yearly_summary: Vec<YearlySummary>,
    /// field key -> message
    pub errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    pub repayment_type: RepaymentType,
    pub loan_amount: Money,
    pub effective_loan_amount: Money,
    pub lvr: Decimal,
    pub monthly_repayment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub total_interest: Money,
    pub total_repayments: Money,
    pub requires_lmi: bool,
    pub estimated_lmi: Option<Money>,
    pub reverting_repayment: Option<Money>,
    /// display strings of the money fields above
    pub display: DisplayView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayView {
    pub loan_amount: String,
    pub monthly_repayment: String,
    pub total_interest: String,
    pub total_repayments: String,
    pub lvr: String,
}

impl OutcomeView {
    pub fn from_outcome(outcome: &CalculationOutcome) -> Self {
        match outcome {
            CalculationOutcome::Valid { result, schedule } => OutcomeView {
                status: OutcomeStatus::Valid,
                result: Some(ResultView {
                    repayment_type: result.repayment_type,
                    loan_amount: result.loan_amount,
                    effective_loan_amount: result.effective_loan_amount,
                    lvr: result.lvr,
                    monthly_repayment: result.monthly_repayment,
                    principal_portion: result.principal_portion,
                    interest_portion: result.interest_portion,
                    total_interest: result.total_interest,
                    total_repayments: result.total_repayments,
                    requires_lmi: result.requires_lmi,
                    estimated_lmi: result.estimated_lmi,
                    reverting_repayment: result.reverting_repayment,
                    display: DisplayView {
                        loan_amount: result.loan_amount.to_string(),
                        monthly_repayment: result.monthly_repayment.to_string(),
                        total_interest: result.total_interest.to_string(),
                        total_repayments: result.total_repayments.to_string(),
                        lvr: format!("{:.2}%", result.lvr),
                    },
                }),
                schedule: schedule.entries().to_vec(),
                yearly_summary: schedule.yearly_summary(),
                errors: BTreeMap::new(),
            },
            CalculationOutcome::Invalid { errors } => OutcomeView {
                status: OutcomeStatus::Invalid,
                result: None,
                schedule: Vec::new(),
                yearly_summary: Vec::new(),
                errors: errors.messages(),
            },
        }
    }

    pub fn from_calculator(calculator: &MortgageCalculator) -> Self {
        Self::from_outcome(calculator.outcome())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
