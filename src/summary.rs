use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::schedule::Schedule;

/// totals and headline figures over a schedule; always rebuilt, never patched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub first_payment: Option<Money>,
    pub last_payment: Option<Money>,
    pub period_count: usize,
    pub settled: bool,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            total_principal: schedule.iter().map(|p| p.principal).sum(),
            total_interest: schedule.iter().map(|p| p.interest).sum(),
            total_payment: schedule.iter().map(|p| p.payment).sum(),
            first_payment: schedule.first().map(|p| p.payment),
            last_payment: schedule.last().map(|p| p.payment),
            period_count: schedule.len(),
            settled: schedule.is_settled(),
        }
    }
}
