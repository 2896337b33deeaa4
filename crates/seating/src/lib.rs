//! Seat inventory domain module.
//!
//! This crate owns seat state for one event: the seat state machine and the
//! all-or-nothing batch operations over it. Pure domain logic only: no IO,
//! no locking (callers serialize mutations per event).

pub mod inventory;
pub mod seat;

pub use inventory::{ConfirmationToken, MAX_GROUP_SIZE, SaleRecord, SeatInventory};
pub use seat::{Seat, SeatStatus};
