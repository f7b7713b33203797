use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::schedule::Schedule;

/// full payoff figures for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub period: u32,
    /// balance owed before the period's payment, repaid in full
    pub remaining_principal: Money,
    /// interest originally scheduled for the period
    pub current_interest: Money,
    pub total_payoff: Money,
}

/// early payoff of the whole outstanding balance
pub struct SettlementEngine;

impl SettlementEngine {
    /// payoff quote for `period` without changing anything
    pub fn quote(schedule: &Schedule, period: u32) -> Result<SettlementReceipt> {
        if schedule.is_settled() {
            return Err(LoanError::ScheduleSettled);
        }

        let row = schedule.require(period)?;
        let remaining_principal = schedule.remaining_principal_before(period)?;
        let current_interest = row.interest;

        Ok(SettlementReceipt {
            period,
            remaining_principal,
            current_interest,
            total_payoff: remaining_principal + current_interest,
        })
    }

    /// settle at `period`, truncating everything after it
    pub fn apply(schedule: &Schedule, period: u32) -> Result<(Schedule, SettlementReceipt)> {
        let receipt = match Self::quote(schedule, period) {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!("settlement at period {} rejected: {}", period, err);
                return Err(err);
            }
        };

        let mut periods = schedule.head(period);
        if let Some(last) = periods.last_mut() {
            last.principal = receipt.remaining_principal;
            last.payment = receipt.total_payoff;
            last.remaining_principal = Money::ZERO;
        }

        debug!(
            "settled at period {}: payoff {} ({} principal + {} interest)",
            period, receipt.total_payoff, receipt.remaining_principal, receipt.current_interest
        );

        let settled = Schedule::new(schedule.principal(), periods).into_settled();
        Ok((settled, receipt))
    }
}

/// free-function form of [`SettlementEngine::apply`]
pub fn apply_full_settlement(schedule: &Schedule, period: u32) -> Result<(Schedule, SettlementReceipt)> {
    SettlementEngine::apply(schedule, period)
}
