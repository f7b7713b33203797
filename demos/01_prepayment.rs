/// prepayment - shorten the term vs reduce the payment, with a pinned clock
use chrono::{NaiveDate, TimeZone, Utc};
use loan_schedule_rs::{
    AdjustmentPolicy, LoanCalculator, LoanParameters, Money, SafeTimeProvider, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== prepayment example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let prepay_on = NaiveDate::from_ymd_opt(2024, 4, 1).ok_or("bad date")?;

    let params = LoanParameters::builder()
        .principal(Money::from_major(120_000))
        .annual_rate(dec!(4.9))
        .term_months(12)
        .start_date(start)
        .build()?;

    for policy in [AdjustmentPolicy::ShortenTerm, AdjustmentPolicy::ReducePayment] {
        let mut calc = LoanCalculator::new(params.clone(), &time)?;
        let before = calc.summary();

        let event = calc.prepay(3, Money::from_major(30_000), prepay_on, policy, &time)?;
        let after = calc.summary();

        println!("{:?}:", policy);
        println!("  periods after prepayment: {}", event.new_term_months);
        println!(
            "  payment: {} -> {}",
            event.old_payment.format_cents(),
            event.new_payment.format_cents()
        );
        println!(
            "  total interest: {} -> {}\n",
            before.totals.total_interest.format_cents(),
            after.totals.total_interest.format_cents()
        );
    }

    // a prepayment dated in the past is rejected and recorded
    let mut calc = LoanCalculator::new(params, &time)?;
    let past = NaiveDate::from_ymd_opt(2023, 6, 1).ok_or("bad date")?;
    if let Err(err) = calc.prepay(2, Money::from_major(1_000), past, AdjustmentPolicy::ShortenTerm, &time) {
        println!("rejected ({}): {}", err.kind(), err);
    }
    println!("events recorded: {}", calc.events.len());

    Ok(())
}
