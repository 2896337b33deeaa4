//! Seat identity.

use serde::{Deserialize, Serialize};

/// Seat identifier: row and number, unique within one event's inventory.
///
/// Ordering is row-major so iteration over a seat map walks the hall
/// front-to-back, left-to-right.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SeatId {
    pub row: u32,
    pub number: u32,
}

impl SeatId {
    pub fn new(row: u32, number: u32) -> Self {
        Self { row, number }
    }
}

impl core::fmt::Display for SeatId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "R{}S{}", self.row, self.number)
    }
}
