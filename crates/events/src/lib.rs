//! Update notifications emitted by the booking core.
//!
//! The core publishes a typed event after each committed mutation; UI,
//! marketing and box-office surfaces subscribe through the [`EventBus`]
//! abstraction. Delivery is synchronous and best-effort: missed events are
//! not persisted and subscribers re-query on reconnect.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod notification;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notification::{
    BookingCreated, BookingExpired, BookingNotification, BookingUpdated, RefundIssued, SeatsSold,
};
