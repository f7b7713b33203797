use std::io::Write;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LoanParameters;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::export::ScheduleExport;
use crate::payments::{
    PrepaymentEngine, PrepaymentEvent, PrepaymentRequest, ScheduleGenerator, SettlementEngine,
    SettlementReceipt,
};
use crate::schedule::{PaymentPeriod, Schedule};
use crate::summary::ScheduleSummary;
use crate::types::{AdjustmentPolicy, ExportLocale, LoanId};

/// owns the current schedule of one loan and everything applied to it
pub struct LoanCalculator {
    pub id: LoanId,
    pub events: EventStore,
    params: LoanParameters,
    schedule: Schedule,
    prepayments: Vec<PrepaymentEvent>,
    settlement: Option<SettlementReceipt>,
}

impl LoanCalculator {
    /// generate the initial schedule for `params`
    pub fn new(params: LoanParameters, time_provider: &SafeTimeProvider) -> Result<Self> {
        let schedule = ScheduleGenerator::for_loan(&params)?;
        let id = Uuid::new_v4();

        let mut events = EventStore::new();
        events.emit(Event::ScheduleGenerated {
            loan_id: id,
            method: params.method,
            principal: params.principal,
            term_months: params.term_months,
            monthly_payment: schedule.first().map(|p| p.payment).unwrap_or(Money::ZERO),
            timestamp: time_provider.now(),
        });

        Ok(Self {
            id,
            events,
            params,
            schedule,
            prepayments: Vec::new(),
            settlement: None,
        })
    }

    pub fn params(&self) -> &LoanParameters {
        &self.params
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// prepayments applied so far, oldest first
    pub fn prepayments(&self) -> &[PrepaymentEvent] {
        &self.prepayments
    }

    pub fn settlement(&self) -> Option<&SettlementReceipt> {
        self.settlement.as_ref()
    }

    pub fn is_settled(&self) -> bool {
        self.schedule.is_settled()
    }

    /// apply a partial prepayment; the schedule is replaced only on success
    pub fn prepay(
        &mut self,
        period: u32,
        amount: Money,
        date: NaiveDate,
        policy: AdjustmentPolicy,
        time_provider: &SafeTimeProvider,
    ) -> Result<PrepaymentEvent> {
        let request = PrepaymentRequest {
            period,
            amount,
            date,
            policy,
        };
        self.apply_request(&request, time_provider)
    }

    pub fn apply_request(
        &mut self,
        request: &PrepaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PrepaymentEvent> {
        let outcome =
            PrepaymentEngine::apply_request(&self.params, &self.schedule, request, time_provider);

        let (schedule, event) = match outcome {
            Ok(applied) => applied,
            Err(err) => return Err(self.reject("prepayment", err, time_provider)),
        };

        self.schedule = schedule;
        self.prepayments.push(event.clone());
        self.events.emit(Event::PrepaymentApplied {
            loan_id: self.id,
            period: request.period,
            amount: request.amount,
            date: request.date,
            policy: request.policy,
            new_term_months: event.new_term_months,
            new_payment: event.new_payment,
            timestamp: time_provider.now(),
        });

        Ok(event)
    }

    /// payoff figures for `period` without settling
    pub fn quote_settlement(&self, period: u32) -> Result<SettlementReceipt> {
        SettlementEngine::quote(&self.schedule, period)
    }

    /// pay off the loan at `period`, truncating the schedule there
    pub fn settle(&mut self, period: u32, time_provider: &SafeTimeProvider) -> Result<SettlementReceipt> {
        let (schedule, receipt) = match SettlementEngine::apply(&self.schedule, period) {
            Ok(settled) => settled,
            Err(err) => return Err(self.reject("settlement", err, time_provider)),
        };

        self.schedule = schedule;
        self.settlement = Some(receipt.clone());
        self.events.emit(Event::LoanSettled {
            loan_id: self.id,
            period,
            total_payoff: receipt.total_payoff,
            timestamp: time_provider.now(),
        });

        Ok(receipt)
    }

    pub fn summary(&self) -> LoanSummary {
        LoanSummary {
            annual_rate: self.params.display_annual_rate(),
            method: self.params.method.label().to_string(),
            totals: ScheduleSummary::from_schedule(&self.schedule),
        }
    }

    pub fn export(&self, locale: ExportLocale) -> ScheduleExport {
        ScheduleExport::from_schedule(&self.schedule, locale)
    }

    pub fn write_csv<W: Write>(&self, writer: W, locale: ExportLocale, with_bom: bool) -> Result<()> {
        self.export(locale).write_csv(writer, with_bom)
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn to_view(&self) -> LoanView {
        LoanView {
            id: self.id,
            parameters: self.params.clone(),
            summary: self.summary(),
            schedule: self.schedule.periods().to_vec(),
            prepayments: self.prepayments.clone(),
            settlement: self.settlement.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_view()).map_err(|e| LoanError::CalculationError {
            message: e.to_string(),
        })
    }

    fn reject(&mut self, operation: &str, err: LoanError, time_provider: &SafeTimeProvider) -> LoanError {
        self.events.emit(Event::OperationRejected {
            loan_id: self.id,
            operation: operation.to_string(),
            kind: err.kind().to_string(),
            reason: err.to_string(),
            timestamp: time_provider.now(),
        });
        err
    }
}

/// headline figures shown next to a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    /// nominal rate as an annual percentage
    pub annual_rate: Decimal,
    pub method: String,
    #[serde(flatten)]
    pub totals: ScheduleSummary,
}

/// serializable view of a calculator's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub parameters: LoanParameters,
    pub summary: LoanSummary,
    pub schedule: Vec<PaymentPeriod>,
    pub prepayments: Vec<PrepaymentEvent>,
    pub settlement: Option<SettlementReceipt>,
}
