use chrono::{Datelike, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::interest::RateConverter;
use crate::types::{RateBasis, RepaymentMethod};

/// immutable loan terms, fixed when the schedule is first calculated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    /// nominal rate as a percentage, 4.9 meaning 4.9%
    pub nominal_rate: Decimal,
    #[serde(default)]
    pub rate_basis: RateBasis,
    pub term_months: u32,
    #[serde(default)]
    pub method: RepaymentMethod,
    /// first payment falls one month after this date
    pub start_date: NaiveDate,
}

impl LoanParameters {
    pub fn new(
        principal: Money,
        nominal_rate: Decimal,
        rate_basis: RateBasis,
        term_months: u32,
        method: RepaymentMethod,
        start_date: NaiveDate,
    ) -> Result<Self> {
        let params = Self {
            principal,
            nominal_rate,
            rate_basis,
            term_months,
            method,
            start_date,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn builder() -> LoanParametersBuilder {
        LoanParametersBuilder::new()
    }

    /// parse and validate parameters from json
    pub fn from_json(json: &str) -> Result<Self> {
        let params: LoanParameters =
            serde_json::from_str(json).map_err(|e| LoanError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| LoanError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(LoanError::InvalidPrincipal {
                principal: self.principal,
            });
        }

        // surfaces InvalidRate
        self.monthly_rate()?;

        if self.term_months < 1 {
            return Err(LoanError::InvalidTerm {
                term: self.term_months,
            });
        }

        Ok(())
    }

    pub fn monthly_rate(&self) -> Result<Rate> {
        RateConverter::to_monthly(self.nominal_rate, self.rate_basis)
    }

    /// nominal rate restated per year, as shown in summaries
    pub fn display_annual_rate(&self) -> Decimal {
        RateConverter::to_annual_percentage(self.nominal_rate, self.rate_basis)
    }
}

/// fluent builder for [`LoanParameters`]
#[derive(Debug, Clone, Default)]
pub struct LoanParametersBuilder {
    principal: Option<Money>,
    nominal_rate: Option<Decimal>,
    rate_basis: RateBasis,
    term_months: Option<u32>,
    method: RepaymentMethod,
    start_date: Option<NaiveDate>,
}

impl LoanParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn nominal_rate(mut self, rate: Decimal) -> Self {
        self.nominal_rate = Some(rate);
        self
    }

    pub fn annual_rate(mut self, rate: Decimal) -> Self {
        self.nominal_rate = Some(rate);
        self.rate_basis = RateBasis::Annual;
        self
    }

    pub fn monthly_rate(mut self, rate: Decimal) -> Self {
        self.nominal_rate = Some(rate);
        self.rate_basis = RateBasis::Monthly;
        self
    }

    pub fn term_months(mut self, term: u32) -> Self {
        self.term_months = Some(term);
        self
    }

    pub fn method(mut self, method: RepaymentMethod) -> Self {
        self.method = method;
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// default the start date to the first day of next month
    pub fn start_next_month(mut self, time: &SafeTimeProvider) -> Self {
        self.start_date = first_of_next_month(time.now().date_naive());
        self
    }

    pub fn build(self) -> Result<LoanParameters> {
        let principal = self.principal.ok_or(LoanError::InvalidConfiguration {
            message: "principal is required".to_string(),
        })?;
        let nominal_rate = self.nominal_rate.ok_or(LoanError::InvalidConfiguration {
            message: "rate is required".to_string(),
        })?;
        let term_months = self.term_months.ok_or(LoanError::InvalidConfiguration {
            message: "term is required".to_string(),
        })?;
        let start_date = self.start_date.ok_or(LoanError::InvalidConfiguration {
            message: "start date is required".to_string(),
        })?;

        LoanParameters::new(
            principal,
            nominal_rate,
            self.rate_basis,
            term_months,
            self.method,
            start_date,
        )
    }
}

fn first_of_next_month(today: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}
