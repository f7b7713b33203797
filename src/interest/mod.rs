use rust_decimal::Decimal;

use crate::decimal::Rate;
use crate::errors::{LoanError, Result};
use crate::types::RateBasis;

/// converts quoted nominal rates into the monthly rate used by every schedule
pub struct RateConverter;

impl RateConverter {
    /// normalize a nominal percentage (4.9 meaning 4.9%) to a monthly decimal rate
    pub fn to_monthly(nominal: Decimal, basis: RateBasis) -> Result<Rate> {
        if nominal.is_sign_negative() && !nominal.is_zero() {
            return Err(LoanError::InvalidRate { rate: nominal });
        }

        let rate = Rate::from_percentage(nominal);
        Ok(match basis {
            RateBasis::Annual => rate.monthly_rate(),
            RateBasis::Monthly => rate,
        })
    }

    /// nominal percentage restated per year, for display
    pub fn to_annual_percentage(nominal: Decimal, basis: RateBasis) -> Decimal {
        match basis {
            RateBasis::Annual => nominal,
            RateBasis::Monthly => nominal * Decimal::from(12),
        }
    }
}
