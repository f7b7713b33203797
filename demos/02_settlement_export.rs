/// settlement and export - pay off early, then write the schedule as csv
use loan_schedule_rs::{
    ExportLocale, LoanCalculator, LoanParameters, RepaymentMethod, SafeTimeProvider, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    let params = LoanParameters::from_json(
        r#"{
            "principal": "300000",
            "nominal_rate": "4.2",
            "term_months": 36,
            "method": "equal-principal",
            "start_date": "2024-03-15"
        }"#,
    )?;
    assert_eq!(params.method, RepaymentMethod::EqualPrincipal);
    assert_eq!(params.nominal_rate, dec!(4.2));

    let mut calc = LoanCalculator::new(params, &time)?;

    let quote = calc.quote_settlement(12)?;
    println!("payoff at period 12: {}", quote.total_payoff.format_cents());

    calc.settle(12, &time)?;
    println!("settled: {}\n", calc.is_settled());

    // bom so spreadsheet tools pick up utf-8 headers
    calc.write_csv(std::io::stdout(), ExportLocale::Chinese, true)?;

    println!("\n{}", calc.to_json_pretty()?);

    // settlement is terminal
    if let Err(err) = calc.settle(13, &time) {
        println!("after settlement: {}", err);
    }

    Ok(())
}
