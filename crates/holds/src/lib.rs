//! Hold lifecycle domain module.
//!
//! This crate contains the state machine governing a booking's provisional
//! hold, implemented purely as deterministic domain logic (no IO, no clock
//! reads: callers pass `now` explicitly).

pub mod hold;

pub use hold::{HOLD_WINDOW_DAYS, Hold, HoldState};
