use chrono::{Months, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use crate::config::LoanParameters;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::schedule::{PaymentPeriod, Schedule};
use crate::types::RepaymentMethod;

/// schedule generator for one repayment method
pub struct ScheduleGenerator {
    method: RepaymentMethod,
}

impl ScheduleGenerator {
    pub fn new(method: RepaymentMethod) -> Self {
        Self { method }
    }

    /// full schedule for validated loan parameters
    pub fn for_loan(params: &LoanParameters) -> Result<Schedule> {
        params.validate()?;
        let generator = Self::new(params.method);
        generator.generate(
            params.principal,
            params.monthly_rate()?,
            params.term_months,
            params.start_date,
        )
    }

    /// calculate a full schedule starting at period 1
    pub fn generate(
        &self,
        principal: Money,
        monthly_rate: Rate,
        term_months: u32,
        start_date: NaiveDate,
    ) -> Result<Schedule> {
        let periods = match self.method {
            RepaymentMethod::EqualPayment => {
                equal_payment_periods(principal, monthly_rate, term_months, start_date, 0)?
            }
            RepaymentMethod::EqualPrincipal => {
                equal_principal_periods(principal, monthly_rate, term_months, start_date)?
            }
            RepaymentMethod::InterestOnly => {
                interest_only_periods(principal, monthly_rate, term_months, start_date)?
            }
        };

        debug!(
            "generated {} schedule: principal {}, monthly rate {}, {} periods",
            self.method,
            principal,
            monthly_rate.as_decimal(),
            periods.len()
        );

        Ok(Schedule::new(principal, periods))
    }
}

/// equal payments (annuity)
///
/// Period indices and due dates both start after `period_offset`, so a
/// continuation generated mid-schedule lines up with the periods it follows.
pub fn equal_payment_periods(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
    start_date: NaiveDate,
    period_offset: u32,
) -> Result<Vec<PaymentPeriod>> {
    check_term(term_months)?;
    let payment = annuity_payment(principal.as_decimal(), monthly_rate, term_months)?;

    amortize(principal, monthly_rate, term_months, start_date, period_offset, |interest| {
        payment - interest
    })
}

/// equal principal (declining payment)
pub fn equal_principal_periods(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
    start_date: NaiveDate,
) -> Result<Vec<PaymentPeriod>> {
    check_term(term_months)?;
    let share = principal.as_decimal() / Decimal::from(term_months);

    amortize(principal, monthly_rate, term_months, start_date, 0, |_| share)
}

/// walks the balance at full decimal precision and rounds only the rows
///
/// Each row's principal is the drop between consecutive rounded balances, so
/// the balance chain and the principal total are exact. The final period
/// repays whatever is left.
fn amortize<F>(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
    start_date: NaiveDate,
    period_offset: u32,
    principal_share: F,
) -> Result<Vec<PaymentPeriod>>
where
    F: Fn(Decimal) -> Decimal,
{
    let r = monthly_rate.as_decimal();
    let mut periods = Vec::with_capacity(term_months as usize);
    let mut balance = principal.as_decimal();
    let mut remaining = principal;

    for i in 1..=term_months {
        let period = i + period_offset;
        let interest = balance.checked_mul(r).ok_or_else(|| overflow("interest"))?;

        balance = (balance - principal_share(interest).min(balance)).max(Decimal::ZERO);

        let opening = remaining;
        remaining = if i == term_months {
            Money::ZERO
        } else {
            Money::from_decimal(balance)
        };

        let principal_portion = opening - remaining;
        let interest = Money::from_decimal(interest);

        periods.push(PaymentPeriod {
            period,
            payment_date: add_months(start_date, period)?,
            principal: principal_portion,
            interest,
            payment: principal_portion + interest,
            remaining_principal: remaining,
        });
    }

    Ok(periods)
}

/// interest only with the principal repaid in the last period
pub fn interest_only_periods(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
    start_date: NaiveDate,
) -> Result<Vec<PaymentPeriod>> {
    check_term(term_months)?;
    let interest = principal.apply_rate(monthly_rate);

    let mut periods = Vec::with_capacity(term_months as usize);

    for period in 1..=term_months {
        let is_last = period == term_months;

        let (principal_portion, remaining_principal) = if is_last {
            (principal, Money::ZERO)
        } else {
            (Money::ZERO, principal)
        };

        periods.push(PaymentPeriod {
            period,
            payment_date: add_months(start_date, period)?,
            principal: principal_portion,
            interest,
            payment: principal_portion + interest,
            remaining_principal,
        });
    }

    Ok(periods)
}

/// constant annuity payment: P * r * (1 + r)^n / ((1 + r)^n - 1)
pub fn equal_payment_amount(principal: Money, monthly_rate: Rate, term_months: u32) -> Result<Money> {
    check_term(term_months)?;
    annuity_payment(principal.as_decimal(), monthly_rate, term_months).map(Money::from_decimal)
}

/// unrounded annuity payment
fn annuity_payment(principal: Decimal, monthly_rate: Rate, term_months: u32) -> Result<Decimal> {
    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let r = monthly_rate.as_decimal();
    let compound = compound_factor(r, term_months)?;

    let numerator = principal
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .ok_or_else(|| overflow("annuity numerator"))?;
    let denominator = compound - Decimal::ONE;

    numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow("annuity payment"))
}

/// (1 + r)^n
fn compound_factor(r: Decimal, n: u32) -> Result<Decimal> {
    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..n {
        compound = compound
            .checked_mul(base)
            .ok_or_else(|| overflow("compound factor"))?;
    }
    Ok(compound)
}

/// due date of `months` after `date`, clamped to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LoanError::CalculationError {
            message: format!("payment date out of range: {} + {} months", date, months),
        })
}

fn check_term(term_months: u32) -> Result<()> {
    if term_months < 1 {
        return Err(LoanError::InvalidTerm { term: term_months });
    }
    Ok(())
}

fn overflow(what: &str) -> LoanError {
    LoanError::CalculationError {
        message: format!("decimal overflow computing {}", what),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tolerance() -> Decimal {
        dec!(0.000001)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual(pct: Decimal) -> Rate {
        Rate::from_percentage(pct).monthly_rate()
    }

    fn generate(method: RepaymentMethod, rate: Rate) -> Schedule {
        ScheduleGenerator::new(method)
            .generate(Money::from_major(120_000), rate, 12, date(2024, 1, 1))
            .unwrap()
    }

    #[test]
    fn test_equal_payment_reference_loan() {
        let schedule = generate(RepaymentMethod::EqualPayment, annual(dec!(4.9)));

        assert_eq!(schedule.len(), 12);
        assert!(schedule.is_contiguous());

        let first = schedule.first().unwrap();
        assert_eq!(first.payment_date, date(2024, 2, 1));
        assert_eq!(first.payment.format_cents(), "10267.40");
        assert_eq!(first.interest.format_cents(), "490.00");

        let last = schedule.last().unwrap();
        assert_eq!(last.payment_date, date(2025, 1, 1));
        assert!(last.remaining_principal.approx_eq(Money::ZERO, tolerance()));
        assert_eq!(last.remaining_principal.format_cents(), "0.00");
    }

    #[test]
    fn test_equal_payment_is_constant() {
        let schedule = generate(RepaymentMethod::EqualPayment, annual(dec!(4.9)));
        let payment = schedule.first().unwrap().payment;

        for row in &schedule {
            assert!(row.payment.approx_eq(payment, tolerance()), "period {}: {}", row.period, row.payment);
            assert_eq!(row.principal + row.interest, row.payment);
        }
    }

    #[test]
    fn test_principal_sums_to_loan() {
        for method in [RepaymentMethod::EqualPayment, RepaymentMethod::EqualPrincipal] {
            let schedule = generate(method, annual(dec!(4.9)));
            let total: Money = schedule.iter().map(|p| p.principal).sum();
            assert_eq!(total, Money::from_major(120_000), "{method}");
        }

        let schedule = generate(RepaymentMethod::InterestOnly, annual(dec!(4.9)));
        let total: Money = schedule.iter().map(|p| p.principal).sum();
        assert_eq!(total, Money::from_major(120_000));
    }

    #[test]
    fn test_balance_chain_holds() {
        for method in [RepaymentMethod::EqualPayment, RepaymentMethod::EqualPrincipal] {
            let schedule = generate(method, annual(dec!(7.2)));
            let mut before = schedule.principal();
            for row in &schedule {
                let expected = (before - row.principal).max(Money::ZERO);
                assert_eq!(row.remaining_principal, expected);
                assert!(row.remaining_principal <= before);
                before = row.remaining_principal;
            }
        }
    }

    #[test]
    fn test_zero_rate_equal_payment() {
        let schedule = generate(RepaymentMethod::EqualPayment, Rate::ZERO);

        for row in &schedule {
            assert_eq!(row.payment, Money::from_major(10_000));
            assert_eq!(row.principal, Money::from_major(10_000));
            assert_eq!(row.interest, Money::ZERO);
        }
        assert_eq!(schedule.last().unwrap().remaining_principal, Money::ZERO);
    }

    #[test]
    fn test_equal_principal_declines() {
        let schedule = generate(RepaymentMethod::EqualPrincipal, annual(dec!(4.9)));

        assert_eq!(schedule.first().unwrap().interest.format_cents(), "490.00");
        assert_eq!(schedule.first().unwrap().payment.format_cents(), "10490.00");

        for pair in schedule.periods().windows(2) {
            assert_eq!(pair[0].principal, Money::from_major(10_000));
            assert!(pair[1].interest < pair[0].interest);
            assert!(pair[1].payment < pair[0].payment);
        }
        assert_eq!(schedule.last().unwrap().remaining_principal, Money::ZERO);
    }

    #[test]
    fn test_interest_only_balloon() {
        let schedule = generate(RepaymentMethod::InterestOnly, annual(dec!(4.9)));

        for row in &schedule.periods()[..11] {
            assert_eq!(row.principal, Money::ZERO);
            assert_eq!(row.interest.format_cents(), "490.00");
            assert_eq!(row.payment.format_cents(), "490.00");
            assert_eq!(row.remaining_principal, Money::from_major(120_000));
        }

        let last = schedule.last().unwrap();
        assert_eq!(last.principal, Money::from_major(120_000));
        assert_eq!(last.payment.format_cents(), "120490.00");
        assert_eq!(last.remaining_principal, Money::ZERO);
    }

    #[test]
    fn test_dates_advance_one_month() {
        let schedule = ScheduleGenerator::new(RepaymentMethod::EqualPrincipal)
            .generate(Money::from_major(6_000), annual(dec!(3)), 6, date(2024, 1, 31))
            .unwrap();

        let dates: Vec<NaiveDate> = schedule.iter().map(|p| p.payment_date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30),
                date(2024, 5, 31),
                date(2024, 6, 30),
                date(2024, 7, 31),
            ]
        );
    }

    #[test]
    fn test_offset_continues_numbering_and_dates() {
        let rows = equal_payment_periods(
            Money::from_major(50_000),
            annual(dec!(4.9)),
            4,
            date(2024, 1, 1),
            3,
        )
        .unwrap();

        assert_eq!(rows[0].period, 4);
        assert_eq!(rows[0].payment_date, date(2024, 5, 1));
        assert_eq!(rows[3].period, 7);
        assert_eq!(rows[3].payment_date, date(2024, 8, 1));
    }

    #[test]
    fn test_zero_term_rejected() {
        let err = ScheduleGenerator::new(RepaymentMethod::InterestOnly)
            .generate(Money::from_major(1_000), Rate::ZERO, 0, date(2024, 1, 1))
            .unwrap_err();
        assert_eq!(err, LoanError::InvalidTerm { term: 0 });
    }

    #[test]
    fn test_single_period_loan() {
        let schedule = generate_term(RepaymentMethod::EqualPayment, 1);
        let only = schedule.first().unwrap();
        assert_eq!(only.principal, Money::from_major(1_000));
        assert_eq!(only.remaining_principal, Money::ZERO);
    }

    #[test]
    fn test_long_terms_close_exactly() {
        let principals = [
            Money::from_major(100_000),
            Money::from_major(1_000_000),
            Money::from_str_exact("3333333.33").unwrap(),
        ];

        for method in [RepaymentMethod::EqualPayment, RepaymentMethod::EqualPrincipal] {
            for principal in principals {
                for pct in [dec!(3.1), dec!(4.9), dec!(6.5), dec!(18)] {
                    for term in [240, 360, 480] {
                        let schedule = ScheduleGenerator::new(method)
                            .generate(principal, annual(pct), term, date(2024, 1, 1))
                            .unwrap();
                        let label = format!("{method} {principal} @ {pct}% / {term}");

                        assert_eq!(schedule.len(), term as usize, "{label}");
                        assert_eq!(schedule.last().unwrap().remaining_principal, Money::ZERO, "{label}");

                        let total: Money = schedule.iter().map(|p| p.principal).sum();
                        assert_eq!(total, principal, "{label}");

                        if method == RepaymentMethod::EqualPayment {
                            let payment = schedule.first().unwrap().payment;
                            for row in &schedule {
                                assert!(
                                    row.payment.approx_eq(payment, tolerance()),
                                    "{label} period {}: {} vs {}",
                                    row.period,
                                    row.payment,
                                    payment
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_steep_rate_final_row_exports_zero() {
        let schedule = ScheduleGenerator::new(RepaymentMethod::EqualPayment)
            .generate(Money::from_major(50_000_000), annual(dec!(24)), 600, date(2024, 1, 1))
            .unwrap();

        let first = schedule.first().unwrap().payment;
        let last = schedule.last().unwrap();
        assert_eq!(last.remaining_principal.format_cents(), "0.00");
        assert!(last.payment.approx_eq(first, tolerance()), "{} vs {}", last.payment, first);
    }

    #[test]
    fn test_long_term_balance_chain() {
        let schedule = ScheduleGenerator::new(RepaymentMethod::EqualPayment)
            .generate(Money::from_major(250_000), annual(dec!(5.25)), 360, date(2024, 1, 31))
            .unwrap();

        let mut before = schedule.principal();
        for row in &schedule {
            assert_eq!(row.remaining_principal, before - row.principal);
            before = row.remaining_principal;
        }
        assert_eq!(before, Money::ZERO);
    }

    fn generate_term(method: RepaymentMethod, term: u32) -> Schedule {
        ScheduleGenerator::new(method)
            .generate(Money::from_major(1_000), annual(dec!(12)), term, date(2024, 1, 1))
            .unwrap()
    }
}
