use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a calculated loan
pub type LoanId = Uuid;

/// basis the nominal rate is quoted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    /// nominal rate per year, divided by 12 for the monthly rate
    #[default]
    Annual,
    /// nominal rate per month, used as-is
    Monthly,
}

/// repayment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RepaymentMethod {
    /// constant total payment, growing principal share (annuity)
    #[default]
    EqualPayment,
    /// constant principal share, declining total payment
    EqualPrincipal,
    /// interest every period, principal repaid in the final period
    InterestOnly,
}

impl RepaymentMethod {
    /// english display label
    pub fn label(&self) -> &'static str {
        match self {
            RepaymentMethod::EqualPayment => "Equal payment",
            RepaymentMethod::EqualPrincipal => "Equal principal",
            RepaymentMethod::InterestOnly => "Interest only",
        }
    }

    /// chinese display label
    pub fn label_zh(&self) -> &'static str {
        match self {
            RepaymentMethod::EqualPayment => "等额本息",
            RepaymentMethod::EqualPrincipal => "等额本金",
            RepaymentMethod::InterestOnly => "先息后本",
        }
    }
}

impl fmt::Display for RepaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// how the remaining schedule is re-amortized after a partial prepayment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentPolicy {
    /// keep the monthly payment, finish earlier
    ShortenTerm,
    /// keep the contractual end, lower the monthly payment
    ReducePayment,
}

/// language used for export headers and the total row label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExportLocale {
    #[default]
    English,
    Chinese,
}

impl ExportLocale {
    pub fn headers(&self) -> [&'static str; 6] {
        match self {
            ExportLocale::English => [
                "Period",
                "Payment date",
                "Principal",
                "Interest",
                "Payment",
                "Remaining principal",
            ],
            ExportLocale::Chinese => [
                "期数",
                "还款日期",
                "应还本金 (元)",
                "应还利息 (元)",
                "当期总还款额 (元)",
                "剩余本金 (元)",
            ],
        }
    }

    pub fn total_label(&self) -> &'static str {
        match self {
            ExportLocale::English => "Total",
            ExportLocale::Chinese => "总计",
        }
    }
}
