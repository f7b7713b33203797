/// quick start - generate a schedule and print it
use loan_schedule_rs::{LoanCalculator, LoanParameters, Money, SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    // 120,000 over 12 months at 4.9% a year, starting on the first of next month
    let params = LoanParameters::builder()
        .principal(Money::from_major(120_000))
        .annual_rate(dec!(4.9))
        .term_months(12)
        .start_next_month(&time)
        .build()?;

    let calc = LoanCalculator::new(params, &time)?;

    for row in calc.schedule() {
        println!(
            "{:>3}  {}  {:>10}  {:>8}  {:>10}  {:>10}",
            row.period,
            row.payment_date,
            row.principal.format_cents(),
            row.interest.format_cents(),
            row.payment.format_cents(),
            row.remaining_principal.format_cents(),
        );
    }

    let summary = calc.summary();
    println!("\ntotal interest: {}", summary.totals.total_interest.format_cents());
    println!("total payment:  {}", summary.totals.total_payment.format_cents());

    Ok(())
}
