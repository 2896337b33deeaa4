//! `stagehall-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy, money/ticket pricing, date-interval
//! arithmetic, and the shared venue/activity/booking model.

pub mod booking;
pub mod catalog;
pub mod entity;
pub mod error;
pub mod id;
pub mod interval;
pub mod money;
pub mod seat;

pub use booking::{Booking, Pricing};
pub use catalog::{Activity, ActivityKind, Venue, VenueCategory};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ActivityId, BookingId, CustomerId, StaffId, VenueId};
pub use interval::{DateRange, TimeInterval};
pub use money::{Money, TicketType};
pub use seat::SeatId;
