use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::LoanParameters;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::schedule::Schedule;
use crate::types::{AdjustmentPolicy, RepaymentMethod};

use super::amortization::equal_payment_periods;
use super::term::TermSolver;

/// partial prepayment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentRequest {
    pub period: u32,
    pub amount: Money,
    pub date: NaiveDate,
    pub policy: AdjustmentPolicy,
}

/// record of an applied prepayment, reported back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentEvent {
    pub period: u32,
    pub date: NaiveDate,
    pub amount: Money,
    pub policy: AdjustmentPolicy,
    pub remaining_principal_before: Money,
    pub new_remaining_principal: Money,
    /// periods regenerated after `period`
    pub new_term_months: u32,
    pub old_payment: Money,
    pub new_payment: Money,
}

/// partial prepayment re-amortization
pub struct PrepaymentEngine {
    policy: AdjustmentPolicy,
}

impl PrepaymentEngine {
    pub fn new(policy: AdjustmentPolicy) -> Self {
        Self { policy }
    }

    /// apply a request using the policy it carries
    pub fn apply_request(
        params: &LoanParameters,
        schedule: &Schedule,
        request: &PrepaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<(Schedule, PrepaymentEvent)> {
        Self::new(request.policy).apply(
            params,
            schedule,
            request.period,
            request.amount,
            request.date,
            time_provider,
        )
    }

    /// splice a re-amortized tail after `period`
    ///
    /// Periods 1..=period are kept as they are. The tail is regenerated as an
    /// equal-payment schedule on the balance owed before `period` less
    /// `amount`. The input schedule is never modified.
    pub fn apply(
        &self,
        params: &LoanParameters,
        schedule: &Schedule,
        period: u32,
        amount: Money,
        event_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<(Schedule, PrepaymentEvent)> {
        let outcome = self.prepare(params, schedule, period, amount, event_date, time_provider);
        if let Err(err) = &outcome {
            warn!("prepayment of {} at period {} rejected: {}", amount, period, err);
        }
        outcome
    }

    fn prepare(
        &self,
        params: &LoanParameters,
        schedule: &Schedule,
        period: u32,
        amount: Money,
        event_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<(Schedule, PrepaymentEvent)> {
        if schedule.is_settled() {
            return Err(LoanError::ScheduleSettled);
        }

        let invalid = |reason: String| LoanError::InvalidPrepayment {
            period,
            amount,
            reason,
        };

        if period < 1 || period > params.term_months {
            return Err(invalid(format!(
                "period must be between 1 and {}",
                params.term_months
            )));
        }

        let remaining_before = schedule.remaining_principal_before(period)?;

        if !amount.is_positive() {
            return Err(invalid("amount must be positive".to_string()));
        }

        if amount >= remaining_before {
            return Err(invalid(format!(
                "amount must be less than the remaining principal {}; settle the loan instead",
                remaining_before
            )));
        }

        let today = time_provider.now().date_naive();
        if event_date < today {
            return Err(invalid(format!(
                "date {} is earlier than today ({})",
                event_date, today
            )));
        }

        let monthly_rate = params.monthly_rate()?;
        let new_remaining = remaining_before - amount;
        let old_payment = schedule
            .first()
            .map(|p| p.payment)
            .unwrap_or(Money::ZERO);

        let new_term = match self.policy {
            AdjustmentPolicy::ShortenTerm => {
                if params.method != RepaymentMethod::EqualPayment {
                    return Err(invalid(format!(
                        "shortening the term requires an equal-payment loan, not {}",
                        params.method
                    )));
                }
                TermSolver::solve(new_remaining, monthly_rate, old_payment)?
            }
            AdjustmentPolicy::ReducePayment => {
                let remaining_terms = params.term_months - period;
                if remaining_terms == 0 {
                    return Err(invalid(
                        "no periods remain after the final period to re-amortize".to_string(),
                    ));
                }
                remaining_terms
            }
        };

        let tail = equal_payment_periods(
            new_remaining,
            monthly_rate,
            new_term,
            params.start_date,
            period,
        )?;
        let new_payment = tail.first().map(|p| p.payment).unwrap_or(Money::ZERO);

        debug!(
            "prepayment {:?} at period {}: balance {} -> {}, {} periods regenerated",
            self.policy, period, remaining_before, new_remaining, new_term
        );

        let mut periods = schedule.head(period);
        periods.extend(tail);

        let event = PrepaymentEvent {
            period,
            date: event_date,
            amount,
            policy: self.policy,
            remaining_principal_before: remaining_before,
            new_remaining_principal: new_remaining,
            new_term_months: new_term,
            old_payment,
            new_payment,
        };

        Ok((Schedule::new(schedule.principal(), periods), event))
    }
}

/// free-function form of [`PrepaymentEngine::apply`]
pub fn apply_partial_prepayment(
    params: &LoanParameters,
    schedule: &Schedule,
    period: u32,
    amount: Money,
    event_date: NaiveDate,
    policy: AdjustmentPolicy,
    time_provider: &SafeTimeProvider,
) -> Result<(Schedule, PrepaymentEvent)> {
    PrepaymentEngine::new(policy).apply(params, schedule, period, amount, event_date, time_provider)
}
