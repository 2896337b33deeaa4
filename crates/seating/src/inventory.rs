use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stagehall_core::{DomainError, DomainResult, SeatId, TicketType};

use crate::seat::{Seat, SeatStatus};

/// Largest batch a group hold may request; bigger groups go through a
/// different allocation path outside the core.
pub const MAX_GROUP_SIZE: usize = 12;

/// Token returned to the buyer when a sale commits.
pub type ConfirmationToken = Uuid;

/// Ticket types recorded per seat at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub confirmation: ConfirmationToken,
    pub seats: Vec<(SeatId, TicketType)>,
    pub discount_code: Option<String>,
}

/// Seat inventory for one event.
///
/// Seats are keyed by `(row, number)`, which makes their uniqueness within
/// the event structural. Batch operations are all-or-nothing: every seat is
/// validated before any seat changes state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInventory {
    seats: BTreeMap<SeatId, Seat>,
}

impl SeatInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory from a seat layout.
    ///
    /// Fails with `Validation` on a duplicate `(row, number)` so a booking's
    /// seat allocation either succeeds whole or leaves nothing behind.
    pub fn with_seats(layout: impl IntoIterator<Item = (SeatId, TicketType)>) -> DomainResult<Self> {
        let mut seats = BTreeMap::new();
        for (id, ticket_type) in layout {
            if seats.insert(id, Seat::new(id, ticket_type)).is_some() {
                return Err(DomainError::validation(format!("duplicate seat {id}")));
            }
        }
        Ok(Self { seats })
    }

    /// Rehydrate an inventory from persisted seats, statuses included.
    pub fn from_seats(seats: impl IntoIterator<Item = Seat>) -> DomainResult<Self> {
        let mut map = BTreeMap::new();
        for seat in seats {
            if map.insert(seat.id, seat).is_some() {
                return Err(DomainError::validation(format!("duplicate seat {}", seat.id)));
            }
        }
        Ok(Self { seats: map })
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.seats.get(&id)
    }

    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.values()
    }

    /// Snapshot of seat availability: seat id -> true when Available.
    pub fn availability(&self) -> BTreeMap<SeatId, bool> {
        self.seats
            .iter()
            .map(|(id, seat)| (*id, seat.status == SeatStatus::Available))
            .collect()
    }

    /// Count of seats currently in `status`, per ticket type.
    pub fn counts_by_type(&self, status: SeatStatus) -> BTreeMap<TicketType, u32> {
        let mut counts = BTreeMap::new();
        for seat in self.seats.values() {
            if seat.status == status {
                *counts.entry(seat.ticket_type).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Held seats whose ticket type marks them accessible (wheelchair spaces
    /// and companion seats).
    pub fn held_accessible_seats(&self) -> Vec<Seat> {
        self.seats
            .values()
            .filter(|s| s.status == SeatStatus::Held && s.ticket_type.is_accessible())
            .copied()
            .collect()
    }

    /// Atomically hold a group of up to [`MAX_GROUP_SIZE`] seats.
    ///
    /// The whole batch fails together: if any seat is missing or not
    /// Available, no seat changes state.
    pub fn hold_seats(&mut self, seat_ids: &[SeatId]) -> DomainResult<()> {
        if seat_ids.len() > MAX_GROUP_SIZE {
            return Err(DomainError::group_size_exceeded(seat_ids.len(), MAX_GROUP_SIZE));
        }

        for id in seat_ids {
            let seat = self.seats.get(id).ok_or(DomainError::NotFound)?;
            if seat.status != SeatStatus::Available {
                return Err(DomainError::seat_unavailable(format!(
                    "seat {id} is {:?}",
                    seat.status
                )));
            }
        }

        for id in seat_ids {
            if let Some(seat) = self.seats.get_mut(id) {
                seat.status = SeatStatus::Held;
            }
        }
        Ok(())
    }

    /// Sell a batch of Held or Available seats, returning the confirmation
    /// token and the ticket types recorded per seat. All-or-nothing.
    pub fn sell_seats(
        &mut self,
        seat_ids: &[SeatId],
        discount_code: Option<String>,
    ) -> DomainResult<SaleRecord> {
        for id in seat_ids {
            let seat = self.seats.get(id).ok_or(DomainError::NotFound)?;
            if !seat.status.can_transition_to(SeatStatus::Sold) {
                return Err(DomainError::seat_unavailable(format!(
                    "seat {id} is {:?}",
                    seat.status
                )));
            }
        }

        let mut sold = Vec::with_capacity(seat_ids.len());
        for id in seat_ids {
            if let Some(seat) = self.seats.get_mut(id) {
                seat.status = SeatStatus::Sold;
                sold.push((*id, seat.ticket_type));
            }
        }

        Ok(SaleRecord {
            confirmation: Uuid::now_v7(),
            seats: sold,
            discount_code,
        })
    }

    /// Release Held seats back to Available.
    ///
    /// Idempotent for seats that are already Available; rejects Sold and
    /// Refunded seats before any seat changes state.
    pub fn release_seats(&mut self, seat_ids: &[SeatId]) -> DomainResult<()> {
        for id in seat_ids {
            let seat = self.seats.get(id).ok_or(DomainError::NotFound)?;
            match seat.status {
                SeatStatus::Held | SeatStatus::Available => {}
                other => {
                    return Err(DomainError::invalid_transition(format!(
                        "cannot release seat {id} in state {other:?}"
                    )));
                }
            }
        }

        for id in seat_ids {
            if let Some(seat) = self.seats.get_mut(id) {
                seat.status = SeatStatus::Available;
            }
        }
        Ok(())
    }

    /// Release every Held seat (booking expiry/cancellation path). Returns
    /// the ids that were released.
    pub fn release_all_held(&mut self) -> Vec<SeatId> {
        let mut released = Vec::new();
        for seat in self.seats.values_mut() {
            if seat.status == SeatStatus::Held {
                seat.status = SeatStatus::Available;
                released.push(seat.id);
            }
        }
        released
    }

    /// Sold -> Refunded. Returns the refunded seat's ticket type.
    pub fn refund_seat(&mut self, seat_id: SeatId) -> DomainResult<TicketType> {
        let seat = self.seats.get_mut(&seat_id).ok_or(DomainError::NotFound)?;
        if seat.status != SeatStatus::Sold {
            return Err(DomainError::invalid_transition(format!(
                "cannot refund seat {seat_id} in state {:?}",
                seat.status
            )));
        }
        seat.status = SeatStatus::Refunded;
        Ok(seat.ticket_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(rows: u32, per_row: u32) -> SeatInventory {
        SeatInventory::with_seats((1..=rows).flat_map(|r| {
            (1..=per_row).map(move |n| (SeatId::new(r, n), TicketType::General))
        }))
        .unwrap()
    }

    fn row_ids(row: u32, count: u32) -> Vec<SeatId> {
        (1..=count).map(|n| SeatId::new(row, n)).collect()
    }

    #[test]
    fn duplicate_seat_in_layout_is_rejected() {
        let err = SeatInventory::with_seats([
            (SeatId::new(1, 1), TicketType::General),
            (SeatId::new(1, 1), TicketType::Discounted),
        ])
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn group_hold_of_thirteen_seats_is_rejected() {
        let mut inv = grid(2, 10);
        let ids: Vec<SeatId> = row_ids(1, 10)
            .into_iter()
            .chain(row_ids(2, 3))
            .collect();

        let err = inv.hold_seats(&ids).unwrap_err();
        match err {
            DomainError::GroupSizeExceeded { requested: 13, max: 12 } => {}
            other => panic!("expected GroupSizeExceeded, got {other:?}"),
        }
        assert!(inv.availability().values().all(|a| *a));
    }

    #[test]
    fn group_hold_of_twelve_succeeds_when_all_available() {
        let mut inv = grid(2, 6);
        let ids: Vec<SeatId> = row_ids(1, 6).into_iter().chain(row_ids(2, 6)).collect();

        inv.hold_seats(&ids).unwrap();
        assert!(inv.availability().values().all(|a| !*a));
    }

    #[test]
    fn group_hold_fails_atomically_when_one_seat_is_taken() {
        let mut inv = grid(2, 6);
        inv.sell_seats(&[SeatId::new(2, 6)], None).unwrap();

        let ids: Vec<SeatId> = row_ids(1, 6).into_iter().chain(row_ids(2, 6)).collect();
        let err = inv.hold_seats(&ids).unwrap_err();
        match err {
            DomainError::SeatUnavailable(_) => {}
            other => panic!("expected SeatUnavailable, got {other:?}"),
        }

        // No partial hold: the other eleven seats are untouched.
        let held = inv
            .seats()
            .filter(|s| s.status == SeatStatus::Held)
            .count();
        assert_eq!(held, 0);
    }

    #[test]
    fn sell_transitions_held_and_available_seats_and_records_types() {
        let mut inv = SeatInventory::with_seats([
            (SeatId::new(1, 1), TicketType::Discounted),
            (SeatId::new(1, 2), TicketType::General),
        ])
        .unwrap();
        inv.hold_seats(&[SeatId::new(1, 1)]).unwrap();

        let sale = inv
            .sell_seats(&[SeatId::new(1, 1), SeatId::new(1, 2)], Some("MATINEE".into()))
            .unwrap();

        assert_eq!(sale.seats.len(), 2);
        assert_eq!(sale.seats[0], (SeatId::new(1, 1), TicketType::Discounted));
        assert_eq!(sale.discount_code.as_deref(), Some("MATINEE"));
        assert!(
            inv.seats().all(|s| s.status == SeatStatus::Sold),
            "both seats sold"
        );
    }

    #[test]
    fn release_is_idempotent_for_available_but_rejects_sold() {
        let mut inv = grid(1, 3);
        inv.hold_seats(&[SeatId::new(1, 1)]).unwrap();
        inv.sell_seats(&[SeatId::new(1, 3)], None).unwrap();

        // Held + already-available together succeed.
        inv.release_seats(&[SeatId::new(1, 1), SeatId::new(1, 2)]).unwrap();
        assert_eq!(inv.availability()[&SeatId::new(1, 1)], true);

        let err = inv.release_seats(&[SeatId::new(1, 3)]).unwrap_err();
        match err {
            DomainError::InvalidStateTransition(_) => {}
            other => panic!("expected InvalidStateTransition, got {other:?}"),
        }
    }

    #[test]
    fn refund_requires_sold_state() {
        let mut inv = grid(1, 2);
        inv.sell_seats(&[SeatId::new(1, 1)], None).unwrap();

        assert_eq!(inv.refund_seat(SeatId::new(1, 1)).unwrap(), TicketType::General);

        // Refunding twice, or refunding an available seat, is illegal.
        assert!(matches!(
            inv.refund_seat(SeatId::new(1, 1)),
            Err(DomainError::InvalidStateTransition(_))
        ));
        assert!(matches!(
            inv.refund_seat(SeatId::new(1, 2)),
            Err(DomainError::InvalidStateTransition(_))
        ));
    }

    #[test]
    fn unknown_seat_is_not_found() {
        let mut inv = grid(1, 1);
        assert!(matches!(
            inv.hold_seats(&[SeatId::new(9, 9)]),
            Err(DomainError::NotFound)
        ));
    }

    proptest! {
        /// Property: holding then releasing any subset of available seats
        /// restores the availability snapshot exactly (round-trip law).
        #[test]
        fn hold_then_release_restores_availability(
            picks in prop::collection::btree_set((1u32..=4, 1u32..=3), 1..=12)
        ) {
            let mut inv = grid(4, 3);
            let before = inv.availability();

            let ids: Vec<SeatId> =
                picks.iter().map(|(r, n)| SeatId::new(*r, *n)).collect();

            inv.hold_seats(&ids).unwrap();
            inv.release_seats(&ids).unwrap();

            prop_assert_eq!(inv.availability(), before);
        }
    }
}
