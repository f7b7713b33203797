use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LoanError, Result};

/// one row of a repayment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPeriod {
    /// 1-based period index
    pub period: u32,
    pub payment_date: NaiveDate,
    pub principal: Money,
    pub interest: Money,
    pub payment: Money,
    /// balance left after this period's payment
    pub remaining_principal: Money,
}

/// ordered repayment plan for one loan
///
/// `principal` is the balance owed before period 1. Periods are contiguous
/// from 1. Once `settled` the schedule is terminal and no engine operation
/// accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    principal: Money,
    periods: Vec<PaymentPeriod>,
    settled: bool,
}

impl Schedule {
    pub fn new(principal: Money, periods: Vec<PaymentPeriod>) -> Self {
        Self {
            principal,
            periods,
            settled: false,
        }
    }

    pub(crate) fn into_settled(mut self) -> Self {
        self.settled = true;
        self
    }

    /// opening loan balance
    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn periods(&self) -> &[PaymentPeriod] {
        &self.periods
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PaymentPeriod> {
        self.periods.iter()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn first(&self) -> Option<&PaymentPeriod> {
        self.periods.first()
    }

    pub fn last(&self) -> Option<&PaymentPeriod> {
        self.periods.last()
    }

    /// look up a period by its 1-based index
    pub fn get(&self, period: u32) -> Option<&PaymentPeriod> {
        if period == 0 {
            return None;
        }
        self.periods.get((period - 1) as usize)
    }

    /// like [`Schedule::get`] but reports a missing period as an error
    pub fn require(&self, period: u32) -> Result<&PaymentPeriod> {
        self.get(period).ok_or(LoanError::UnknownPeriod {
            period,
            schedule_len: self.periods.len(),
        })
    }

    /// balance owed immediately before `period`'s scheduled payment
    pub fn remaining_principal_before(&self, period: u32) -> Result<Money> {
        self.require(period)?;
        if period == 1 {
            return Ok(self.principal);
        }
        Ok(self.periods[(period - 2) as usize].remaining_principal)
    }

    /// periods 1..=period, cloned
    pub(crate) fn head(&self, period: u32) -> Vec<PaymentPeriod> {
        let end = (period as usize).min(self.periods.len());
        self.periods[..end].to_vec()
    }

    /// true when indices run 1..=len without gaps
    pub fn is_contiguous(&self) -> bool {
        self.periods
            .iter()
            .enumerate()
            .all(|(i, p)| p.period as usize == i + 1)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a PaymentPeriod;
    type IntoIter = std::slice::Iter<'a, PaymentPeriod>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(period: u32, principal: i64, remaining: i64) -> PaymentPeriod {
        PaymentPeriod {
            period,
            payment_date: NaiveDate::from_ymd_opt(2024, 1 + period, 1).unwrap(),
            principal: Money::from_major(principal),
            interest: Money::from_major(10),
            payment: Money::from_major(principal + 10),
            remaining_principal: Money::from_major(remaining),
        }
    }

    fn sample() -> Schedule {
        Schedule::new(
            Money::from_major(300),
            vec![row(1, 100, 200), row(2, 100, 100), row(3, 100, 0)],
        )
    }

    #[test]
    fn test_lookup_by_period() {
        let schedule = sample();
        assert_eq!(schedule.get(2).unwrap().remaining_principal, Money::from_major(100));
        assert!(schedule.get(0).is_none());
        assert!(schedule.get(4).is_none());
    }

    #[test]
    fn test_remaining_before() {
        let schedule = sample();
        assert_eq!(schedule.remaining_principal_before(1).unwrap(), Money::from_major(300));
        assert_eq!(schedule.remaining_principal_before(3).unwrap(), Money::from_major(100));

        let err = schedule.remaining_principal_before(7).unwrap_err();
        assert_eq!(err, LoanError::UnknownPeriod { period: 7, schedule_len: 3 });
    }

    #[test]
    fn test_contiguity() {
        assert!(sample().is_contiguous());

        let gapped = Schedule::new(Money::from_major(200), vec![row(1, 100, 100), row(3, 100, 0)]);
        assert!(!gapped.is_contiguous());
    }

    #[test]
    fn test_head_clamps_to_length() {
        let schedule = sample();
        assert_eq!(schedule.head(2).len(), 2);
        assert_eq!(schedule.head(9).len(), 3);
    }
}
