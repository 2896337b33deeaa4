//! Report generation.
//!
//! Read-side projections over seat inventory and ledger data. This crate
//! owns no state: reports are derived, recomputed on demand, and never
//! persisted independently of their source counts.

pub mod report;

pub use report::{DashboardData, Report, generate_report, sales_dashboard};
