//! Booking calendar domain module.
//!
//! Indexes bookings per venue and date range, enforces the non-overlap
//! invariant, and answers range/gap queries. Pure domain logic only: no IO,
//! no locking (callers serialize mutations per venue).

pub mod calendar;

pub use calendar::{BookingCalendar, BookingEntry, CancelOutcome};
