//! Revenue ledger domain module.
//!
//! Append-only per-booking financial records (sales, refunds) and the sums
//! derived from them. Pure domain logic only: no IO, no persistence concerns.

pub mod ledger;

pub use ledger::{FinancialRecord, RecordKind, RevenueBreakdown, RevenueLedger};
