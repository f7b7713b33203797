use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// digits kept before rounding the term up; logarithm noise sits far below this
const TERM_PRECISION: u32 = 6;

/// solves the annuity formula for the term
pub struct TermSolver;

impl TermSolver {
    /// minimum whole number of months that repays `remaining_principal` at `monthly_payment`
    ///
    /// n = ln(A / (A - P * r)) / ln(1 + r), rounded up.
    pub fn solve(remaining_principal: Money, monthly_rate: Rate, monthly_payment: Money) -> Result<u32> {
        if !remaining_principal.is_positive() {
            return Err(LoanError::CalculationError {
                message: format!("no principal to amortize: {}", remaining_principal),
            });
        }

        let accruing = remaining_principal.apply_rate(monthly_rate);
        if monthly_payment <= accruing {
            return Err(LoanError::DivergentTerm {
                remaining_principal,
                monthly_payment,
            });
        }

        let p = remaining_principal.as_decimal();
        let a = monthly_payment.as_decimal();

        let exact = if monthly_rate.is_zero() {
            p / a
        } else {
            let r = monthly_rate.as_decimal();
            let ratio = a / (a - accruing.as_decimal());
            let numerator = ratio.checked_ln().ok_or_else(|| ln_error(ratio))?;
            let denominator = (Decimal::ONE + r).checked_ln().ok_or_else(|| ln_error(Decimal::ONE + r))?;
            numerator / denominator
        };

        exact
            .round_dp(TERM_PRECISION)
            .ceil()
            .to_u32()
            .ok_or_else(|| LoanError::CalculationError {
                message: format!("term out of range: {}", exact),
            })
    }
}

fn ln_error(x: Decimal) -> LoanError {
    LoanError::CalculationError {
        message: format!("logarithm undefined for {}", x),
    }
}
