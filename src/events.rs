use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{AdjustmentPolicy, LoanId, RepaymentMethod};

/// all events that can be emitted by a loan calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ScheduleGenerated {
        loan_id: LoanId,
        method: RepaymentMethod,
        principal: Money,
        term_months: u32,
        monthly_payment: Money,
        timestamp: DateTime<Utc>,
    },
    PrepaymentApplied {
        loan_id: LoanId,
        period: u32,
        amount: Money,
        date: NaiveDate,
        policy: AdjustmentPolicy,
        new_term_months: u32,
        new_payment: Money,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: LoanId,
        period: u32,
        total_payoff: Money,
        timestamp: DateTime<Utc>,
    },
    OperationRejected {
        loan_id: LoanId,
        operation: String,
        /// short error kind, e.g. `invalid_prepayment`
        kind: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn loan_id(&self) -> LoanId {
        match self {
            Event::ScheduleGenerated { loan_id, .. }
            | Event::PrepaymentApplied { loan_id, .. }
            | Event::LoanSettled { loan_id, .. }
            | Event::OperationRejected { loan_id, .. } => *loan_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Event::ScheduleGenerated { timestamp, .. }
            | Event::PrepaymentApplied { timestamp, .. }
            | Event::LoanSettled { timestamp, .. }
            | Event::OperationRejected { timestamp, .. } => *timestamp,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// drain everything emitted so far
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn settled(loan_id: LoanId) -> Event {
        Event::LoanSettled {
            loan_id,
            period: 4,
            total_payoff: Money::from_major(80_000),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_take_drains_store() {
        let id = Uuid::new_v4();
        let mut store = EventStore::new();
        store.emit(settled(id));

        assert_eq!(store.len(), 1);
        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].loan_id(), id);
        assert!(store.is_empty());
    }

    #[test]
    fn test_event_serializes_with_variant_tag() {
        let event = settled(Uuid::nil());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["LoanSettled"]["period"], 4);
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.timestamp(), Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }
}
