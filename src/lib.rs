pub mod calculator;
pub mod collateral;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod formatting;
pub mod mortgage;
pub mod parsing;
pub mod repayments;
pub mod serialization;
pub mod types;

// re-export key types
pub use calculator::{CalculationOutcome, InputUpdate, MortgageCalculator};
pub use collateral::{calculate_lmi, calculate_lvr, LmiBand, LmiTable, LvrAssessment, LvrCalculator};
pub use config::{CalculatorConfig, InputLimits};
pub use decimal::{
    basis_points_to_rate, cents_to_dollars, dollars_to_cents, rate_to_basis_points, DecimalContext,
    Money, Rate,
};
pub use errors::{MortgageError, Result, ValidationError, ValidationErrors};
pub use events::{CalculatorEvent, EventStore};
pub use formatting::{format_currency, format_currency_abbreviated, format_number, format_percentage};
pub use mortgage::{calculate_mortgage, calculate_mortgage_with, LoanInputs, MortgageResult};
pub use parsing::{parse_currency_input, parse_percentage_input, parse_repayment_type, parse_years_input};
pub use repayments::{
    calculate_interest_only_repayment, calculate_principal_and_interest_repayment,
    generate_amortization_schedule, generate_blended_schedule, AmortizationEntry,
    AmortizationSchedule, InterestOnlyRepayment, RepaymentBreakdown, RepaymentCalculator,
    YearlySummary,
};
pub use serialization::{OutcomeStatus, OutcomeView};
pub use types::{InputField, RepaymentType, RoundingMode};

// re-export external dependencies that users will need
pub use rust_decimal::Decimal;
