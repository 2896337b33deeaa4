use serde::{Deserialize, Serialize};

use stagehall_core::{SeatId, TicketType};

/// Seat status lifecycle.
///
/// Legal transitions:
/// `Available -> Held -> Sold -> Refunded`, plus `Held -> Available`
/// (release) and `Available -> Sold` (direct sale at the counter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Held,
    Sold,
    Refunded,
}

impl SeatStatus {
    pub fn can_transition_to(self, next: SeatStatus) -> bool {
        matches!(
            (self, next),
            (SeatStatus::Available, SeatStatus::Held)
                | (SeatStatus::Available, SeatStatus::Sold)
                | (SeatStatus::Held, SeatStatus::Available)
                | (SeatStatus::Held, SeatStatus::Sold)
                | (SeatStatus::Sold, SeatStatus::Refunded)
        )
    }
}

/// One seat in an event's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub ticket_type: TicketType,
    pub status: SeatStatus,
}

impl Seat {
    pub fn new(id: SeatId, ticket_type: TicketType) -> Self {
        Self {
            id,
            ticket_type,
            status: SeatStatus::Available,
        }
    }
}
