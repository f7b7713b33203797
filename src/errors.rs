use rust_decimal::Decimal;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    #[error("invalid interest rate: {rate}")]
    InvalidRate {
        rate: Decimal,
    },

    #[error("invalid term: {term} months")]
    InvalidTerm {
        term: u32,
    },

    #[error("invalid principal: {principal}")]
    InvalidPrincipal {
        principal: Money,
    },

    #[error("invalid prepayment of {amount} at period {period}: {reason}")]
    InvalidPrepayment {
        period: u32,
        amount: Money,
        reason: String,
    },

    #[error("payment {monthly_payment} does not cover interest on {remaining_principal}")]
    DivergentTerm {
        remaining_principal: Money,
        monthly_payment: Money,
    },

    #[error("unknown period: {period} (schedule has {schedule_len} periods)")]
    UnknownPeriod {
        period: u32,
        schedule_len: usize,
    },

    #[error("schedule already settled")]
    ScheduleSettled,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },
}

impl LoanError {
    /// short machine-readable kind, stable across messages
    pub fn kind(&self) -> &'static str {
        match self {
            LoanError::InvalidRate { .. } => "invalid_rate",
            LoanError::InvalidTerm { .. } => "invalid_term",
            LoanError::InvalidPrincipal { .. } => "invalid_principal",
            LoanError::InvalidPrepayment { .. } => "invalid_prepayment",
            LoanError::DivergentTerm { .. } => "divergent_term",
            LoanError::UnknownPeriod { .. } => "unknown_period",
            LoanError::ScheduleSettled => "schedule_settled",
            LoanError::InvalidConfiguration { .. } => "invalid_configuration",
            LoanError::CalculationError { .. } => "calculation_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
