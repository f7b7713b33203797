pub mod amortization;
pub mod prepayment;
pub mod settlement;
pub mod term;

pub use amortization::{equal_payment_amount, ScheduleGenerator};
pub use prepayment::{apply_partial_prepayment, PrepaymentEngine, PrepaymentEvent, PrepaymentRequest};
pub use settlement::{apply_full_settlement, SettlementEngine, SettlementReceipt};
pub use term::TermSolver;
