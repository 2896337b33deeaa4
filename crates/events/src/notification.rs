//! Typed update-notification payloads published after committed mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stagehall_core::{BookingId, Money, SeatId, VenueId};

use crate::event::Event;

/// Notification: a booking was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCreated {
    pub booking_id: BookingId,
    pub venue_id: VenueId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub held: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Notification: a booking's interval or details changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingUpdated {
    pub booking_id: BookingId,
    pub venue_id: VenueId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

/// Notification: a provisional hold passed its expiry window and the booking
/// was auto-transitioned to expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingExpired {
    pub booking_id: BookingId,
    pub venue_id: VenueId,
    pub expired_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

/// Notification: seats were sold for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatsSold {
    pub booking_id: BookingId,
    pub seat_ids: Vec<SeatId>,
    pub confirmation: Uuid,
    pub occurred_at: DateTime<Utc>,
}

/// Notification: a sold seat was refunded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundIssued {
    pub booking_id: BookingId,
    pub seat_id: SeatId,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Update notifications published by the box office, with camelCase wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BookingNotification {
    #[serde(rename = "bookingCreated")]
    BookingCreated(BookingCreated),
    #[serde(rename = "bookingUpdated")]
    BookingUpdated(BookingUpdated),
    #[serde(rename = "bookingExpired")]
    BookingExpired(BookingExpired),
    #[serde(rename = "seatsSold")]
    SeatsSold(SeatsSold),
    #[serde(rename = "refundIssued")]
    RefundIssued(RefundIssued),
}

impl Event for BookingNotification {
    fn event_type(&self) -> &'static str {
        match self {
            BookingNotification::BookingCreated(_) => "bookingCreated",
            BookingNotification::BookingUpdated(_) => "bookingUpdated",
            BookingNotification::BookingExpired(_) => "bookingExpired",
            BookingNotification::SeatsSold(_) => "seatsSold",
            BookingNotification::RefundIssued(_) => "refundIssued",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            BookingNotification::BookingCreated(e) => e.occurred_at,
            BookingNotification::BookingUpdated(e) => e.occurred_at,
            BookingNotification::BookingExpired(e) => e.occurred_at,
            BookingNotification::SeatsSold(e) => e.occurred_at,
            BookingNotification::RefundIssued(e) => e.occurred_at,
        }
    }
}
