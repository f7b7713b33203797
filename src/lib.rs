pub mod calculator;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod export;
pub mod interest;
pub mod payments;
pub mod schedule;
pub mod summary;
pub mod types;

// re-export key types
pub use calculator::{LoanCalculator, LoanSummary, LoanView};
pub use config::{LoanParameters, LoanParametersBuilder};
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use export::{ExportRow, ScheduleExport};
pub use interest::RateConverter;
pub use payments::{
    apply_full_settlement, apply_partial_prepayment, PrepaymentEngine, PrepaymentEvent,
    PrepaymentRequest, ScheduleGenerator, SettlementEngine, SettlementReceipt, TermSolver,
};
pub use schedule::{PaymentPeriod, Schedule};
pub use summary::ScheduleSummary;
pub use types::{AdjustmentPolicy, ExportLocale, LoanId, RateBasis, RepaymentMethod};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
