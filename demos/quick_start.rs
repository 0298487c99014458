/// quick start - price a loan, edit it like a form, print the outcome
use mortgage_engine_rs::{
    calculate_mortgage, InputField, InputUpdate, LoanInputs, Money, MortgageCalculator,
    OutcomeView, Rate, RepaymentType,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a $520,000 loan on a $650,000 purchase
    let inputs = LoanInputs {
        purchase_price: Money::from_dollars_whole(650_000),
        deposit: Money::from_dollars_whole(130_000),
        interest_rate: Rate::from_bps(625),
        loan_term_years: 30,
        repayment_type: RepaymentType::PrincipalAndInterest,
        interest_only_period_years: None,
        offset_account_balance: Money::ZERO,
    };

    let result = calculate_mortgage(&inputs)?;
    println!("monthly repayment: {}", result.monthly_repayment);
    println!("total interest:    {}", result.total_interest);
    println!("lvr:               {}%", result.lvr);

    // drive the calculator with raw form text
    let mut calc = MortgageCalculator::default();
    calc.update_from_text(InputField::Deposit, "$25,000");
    calc.update(InputUpdate::OffsetAccountBalance(Money::from_dollars(dec!(40000.50))?));

    if let Some(result) = calc.result() {
        println!("with a 5% deposit: {} per month, LMI {:?}", result.monthly_repayment, result.estimated_lmi);
    }
    for year in calc.schedule().map(|s| s.yearly_summary()).unwrap_or_default().iter().take(3) {
        println!("year {}: balance {}", year.year, year.closing_balance);
    }

    // invalid text leaves the outcome invalid until corrected
    calc.update_from_text(InputField::InterestRate, "six percent");
    println!("{}", OutcomeView::from_calculator(&calc).to_json_pretty()?);

    for event in calc.take_events() {
        println!("{:?}", event);
    }

    Ok(())
}
