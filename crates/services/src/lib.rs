//! Box-office service layer.
//!
//! Composes the calendar, seat inventories, hold lifecycle and revenue
//! ledger behind one capability-tagged interface set: callers pick
//! [`BookingService`], [`SeatService`] or [`ReportingService`] by the
//! capability they need, not by package path. The layer owns the lock
//! scopes (per venue, per event), the persistence write-through, and the
//! update-notification publication.

pub mod api;
pub mod box_office;
pub mod clock;
pub mod locks;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use api::{BookingService, CreateBookingRequest, ReportingService, SeatService};
pub use box_office::BoxOffice;
pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{BookingRecord, BookingStore, InMemoryStore};
