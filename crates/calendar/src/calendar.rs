use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use stagehall_core::{
    Booking, BookingId, DateRange, DomainError, DomainResult, Entity, TimeInterval, VenueId,
};
use stagehall_holds::Hold;

/// One calendar entry: the booking plus its lifecycle bookkeeping.
///
/// Cancelled and expired entries stay in the arena (tombstoned) so historical
/// reports remain consistent; they just stop participating in overlap checks
/// and range queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEntry {
    booking: Booking,
    hold: Option<Hold>,
    cancelled: bool,
}

impl BookingEntry {
    pub fn new(booking: Booking, hold: Option<Hold>) -> Self {
        Self {
            booking,
            hold,
            cancelled: false,
        }
    }

    /// Rebuild an entry from persisted state, tombstone included.
    pub fn restored(booking: Booking, hold: Option<Hold>, cancelled: bool) -> Self {
        Self {
            booking,
            hold,
            cancelled,
        }
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    pub fn hold(&self) -> Option<&Hold> {
        self.hold.as_ref()
    }

    pub fn hold_mut(&mut self) -> Option<&mut Hold> {
        self.hold.as_mut()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Whether this entry occupies its venue at `now`.
    ///
    /// A firm (no-hold) booking always blocks until cancelled. A held booking
    /// blocks only while its hold does; an expired-but-untransitioned hold
    /// never blocks, so lazy expiry cannot let a stale hold deny a slot.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if self.cancelled {
            return false;
        }
        match &self.hold {
            Some(hold) => hold.blocks(now),
            None => true,
        }
    }
}

/// Outcome of a cancellation, so callers can release seats exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    AlreadyCancelled,
}

/// The booking calendar: an arena of entries keyed by id, with a per-venue
/// start-time index for range and overlap queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingCalendar {
    entries: HashMap<BookingId, BookingEntry>,
    by_venue: HashMap<VenueId, BTreeMap<(DateTime<Utc>, BookingId), ()>>,
}

impl BookingCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_insert(&mut self, venue: VenueId, start: DateTime<Utc>, id: BookingId) {
        self.by_venue
            .entry(venue)
            .or_default()
            .insert((start, id), ());
    }

    fn index_remove(&mut self, venue: VenueId, start: DateTime<Utc>, id: BookingId) {
        if let Some(index) = self.by_venue.get_mut(&venue) {
            index.remove(&(start, id));
        }
    }

    /// Active same-venue entry intersecting `interval`, excluding `exclude`.
    fn conflicting_entry(
        &self,
        venue: VenueId,
        interval: &TimeInterval,
        exclude: Option<BookingId>,
        now: DateTime<Utc>,
    ) -> Option<&BookingEntry> {
        let index = self.by_venue.get(&venue)?;
        // Every candidate starts at or before the probe's end; later starts
        // cannot intersect a closed interval.
        for ((_, id), ()) in index.range(..=(interval.end(), BookingId::from_uuid(uuid_max()))) {
            if Some(*id) == exclude {
                continue;
            }
            let Some(entry) = self.entries.get(id) else {
                continue;
            };
            if entry.is_active(now) && entry.booking.interval().intersects(interval) {
                return Some(entry);
            }
        }
        None
    }

    /// Add a booking, enforcing the non-overlap invariant for its venue.
    pub fn add_booking(
        &mut self,
        booking: Booking,
        hold: Option<Hold>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let id = *booking.id();
        if self.entries.contains_key(&id) {
            return Err(DomainError::conflict(format!("booking {id} already exists")));
        }
        if let Some(existing) =
            self.conflicting_entry(booking.venue_id(), &booking.interval(), None, now)
        {
            return Err(DomainError::conflict(format!(
                "venue {} already booked over {:?} by {}",
                booking.venue_id(),
                existing.booking.interval(),
                existing.booking.id(),
            )));
        }

        self.index_insert(booking.venue_id(), booking.start(), id);
        self.entries.insert(id, BookingEntry::new(booking, hold));
        Ok(())
    }

    /// Re-insert an entry loaded from the source of truth at startup.
    ///
    /// Skips the overlap check: the store is trusted, and tombstoned entries
    /// must come back even when a later booking occupies their old slot.
    pub fn restore_entry(&mut self, entry: BookingEntry) {
        let id = *entry.booking.id();
        self.index_insert(entry.booking.venue_id(), entry.booking.start(), id);
        self.entries.insert(id, entry);
    }

    /// Physically remove an entry.
    ///
    /// Compensating action for a creation that failed after the slot was
    /// reserved; a never-committed booking must not linger as a tombstone.
    /// Not part of the cancellation path.
    pub fn remove(&mut self, id: BookingId) -> Option<BookingEntry> {
        let entry = self.entries.remove(&id)?;
        self.index_remove(entry.booking.venue_id(), entry.booking.start(), id);
        Some(entry)
    }

    /// Replace a booking's details, re-validating the overlap rule with the
    /// booking's own previous interval excluded.
    pub fn update_booking(&mut self, booking: Booking, now: DateTime<Utc>) -> DomainResult<()> {
        let id = *booking.id();
        let previous = match self.entries.get(&id) {
            Some(entry) if !entry.cancelled => entry.booking.clone(),
            _ => return Err(DomainError::NotFound),
        };
        if let Some(existing) =
            self.conflicting_entry(booking.venue_id(), &booking.interval(), Some(id), now)
        {
            return Err(DomainError::conflict(format!(
                "venue {} already booked over {:?} by {}",
                booking.venue_id(),
                existing.booking.interval(),
                existing.booking.id(),
            )));
        }

        self.index_remove(previous.venue_id(), previous.start(), id);
        self.index_insert(booking.venue_id(), booking.start(), id);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.booking = booking;
        }
        Ok(())
    }

    /// Tombstone a booking. Idempotent: cancelling twice is a no-op success.
    /// A non-terminal hold is cancelled along with the booking.
    pub fn cancel_booking(&mut self, id: BookingId) -> DomainResult<CancelOutcome> {
        let entry = self.entries.get_mut(&id).ok_or(DomainError::NotFound)?;
        if entry.cancelled {
            return Ok(CancelOutcome::AlreadyCancelled);
        }
        entry.cancelled = true;
        if let Some(hold) = entry.hold.as_mut() {
            if !hold.state().is_terminal() {
                hold.cancel()?;
            }
        }
        Ok(CancelOutcome::Cancelled)
    }

    pub fn find_by_id(&self, id: BookingId) -> DomainResult<&BookingEntry> {
        self.entries.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn entries(&self) -> impl Iterator<Item = &BookingEntry> {
        self.entries.values()
    }

    pub fn entry_mut(&mut self, id: BookingId) -> DomainResult<&mut BookingEntry> {
        self.entries.get_mut(&id).ok_or(DomainError::NotFound)
    }

    /// All active bookings for `activity_id`, ascending by start.
    pub fn find_by_activity_id(
        &self,
        activity_id: stagehall_core::ActivityId,
        now: DateTime<Utc>,
    ) -> Vec<&Booking> {
        let mut found: Vec<&Booking> = self
            .entries
            .values()
            .filter(|e| e.is_active(now) && e.booking.activity_id() == activity_id)
            .map(|e| &e.booking)
            .collect();
        found.sort_by_key(|b| (b.start(), *b.id()));
        found
    }

    /// Active bookings whose interval intersects `[start, end]`, optionally
    /// restricted to one venue, ascending by start.
    pub fn bookings_in_range(
        &self,
        venue: Option<VenueId>,
        range: &TimeInterval,
        now: DateTime<Utc>,
    ) -> Vec<&Booking> {
        let mut found: Vec<&Booking> = self
            .entries
            .values()
            .filter(|e| e.is_active(now))
            .filter(|e| venue.is_none_or(|v| e.booking.venue_id() == v))
            .filter(|e| e.booking.interval().intersects(range))
            .map(|e| &e.booking)
            .collect();
        found.sort_by_key(|b| (b.start(), *b.id()));
        found
    }

    /// Lazily yield the free day-granular sub-intervals of `range` not
    /// covered by any active booking for `venue`.
    ///
    /// Coverage is computed by sorting the active intervals and merging them;
    /// complements are then produced on demand.
    pub fn identify_gaps(
        &self,
        venue: VenueId,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = DateRange> + '_ {
        let mut occupied: Vec<DateRange> = self
            .entries
            .values()
            .filter(|e| e.is_active(now) && e.booking.venue_id() == venue)
            .map(|e| e.booking.interval().days())
            .filter(|days| days.intersects(&range))
            .collect();
        occupied.sort_by_key(|d| d.start);

        // Merge overlapping/adjacent occupied day ranges.
        let mut merged: Vec<DateRange> = Vec::with_capacity(occupied.len());
        for days in occupied {
            match merged.last_mut() {
                Some(last) if days.start <= last.end + Duration::days(1) => {
                    last.end = last.end.max(days.end);
                }
                _ => merged.push(days),
            }
        }

        let mut cursor = Some(range.start);
        let mut blocks = merged.into_iter();
        std::iter::from_fn(move || {
            loop {
                let start = cursor?;
                if start > range.end {
                    cursor = None;
                    return None;
                }
                match blocks.next() {
                    Some(block) => {
                        let next_free = block.end + Duration::days(1);
                        if block.start > start {
                            let gap_end = (block.start - Duration::days(1)).min(range.end);
                            cursor = Some(next_free.max(start));
                            if start <= gap_end {
                                return Some(DateRange { start, end: gap_end });
                            }
                        } else {
                            cursor = Some(next_free.max(start));
                        }
                    }
                    None => {
                        cursor = None;
                        return Some(DateRange {
                            start,
                            end: range.end,
                        });
                    }
                }
            }
        })
    }
}

// Uuid::max() as an inclusive upper bound for (start, id) index range scans.
fn uuid_max() -> uuid::Uuid {
    uuid::Uuid::from_u128(u128::MAX)
}
