//! The box office: one stateful service composing calendar, seat
//! inventories, holds, ledger and reporting behind the capability traits.
//!
//! Concurrency model: shared state sits behind `RwLock`s, and mutations are
//! serialized per venue (calendar) or per booking (seats) through a
//! [`LockRegistry`]. Lock order is always scope mutex, then calendar, then
//! inventories, then ledger.
//!
//! Persistence model: each committed mutation is written through to the
//! [`BookingStore`] before the operation returns. When the store rejects a
//! write, the in-memory mutation is rolled back and the store error becomes
//! the operation's error; there are no internal retries.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use stagehall_calendar::{BookingCalendar, BookingEntry, CancelOutcome};
use stagehall_core::{
    Activity, ActivityId, Booking, BookingId, DateRange, DomainError, DomainResult, Entity, Money,
    SeatId, TimeInterval, Venue, VenueId,
};
use stagehall_events::{
    BookingCreated, BookingExpired, BookingNotification, BookingUpdated, EventBus,
    InMemoryEventBus, RefundIssued, SeatsSold, Subscription,
};
use stagehall_holds::{Hold, HoldState};
use stagehall_ledger::{FinancialRecord, RevenueBreakdown, RevenueLedger};
use stagehall_reporting::{DashboardData, Report, generate_report, sales_dashboard};
use stagehall_seating::{SaleRecord, Seat, SeatInventory};

use crate::api::{BookingService, CreateBookingRequest, ReportingService, SeatService};
use crate::clock::Clock;
use crate::locks::LockRegistry;
use crate::store::{BookingRecord, BookingStore};

pub struct BoxOffice<S: BookingStore> {
    calendar: RwLock<BookingCalendar>,
    inventories: RwLock<HashMap<BookingId, SeatInventory>>,
    ledger: RwLock<RevenueLedger>,
    venues: RwLock<HashMap<VenueId, Venue>>,
    activities: RwLock<HashMap<ActivityId, Activity>>,
    venue_locks: LockRegistry<VenueId>,
    event_locks: LockRegistry<BookingId>,
    store: S,
    bus: InMemoryEventBus<BookingNotification>,
    clock: Arc<dyn Clock>,
}

impl<S: BookingStore> BoxOffice<S> {
    /// Open the box office, rehydrating calendar and seat state from the
    /// source of truth. Tombstoned entries are restored as-is.
    pub fn open(store: S, clock: Arc<dyn Clock>) -> DomainResult<Self> {
        let mut calendar = BookingCalendar::new();
        let mut inventories = HashMap::new();
        for record in store.load_bookings()? {
            let inventory = SeatInventory::from_seats(record.seats.clone())?;
            inventories.insert(*record.booking.id(), inventory);
            calendar.restore_entry(BookingEntry::restored(
                record.booking,
                record.hold,
                record.cancelled,
            ));
        }
        Ok(Self {
            calendar: RwLock::new(calendar),
            inventories: RwLock::new(inventories),
            ledger: RwLock::new(RevenueLedger::new()),
            venues: RwLock::new(HashMap::new()),
            activities: RwLock::new(HashMap::new()),
            venue_locks: LockRegistry::new(),
            event_locks: LockRegistry::new(),
            store,
            bus: InMemoryEventBus::new(),
            clock,
        })
    }

    /// Subscribe to the update-notification stream.
    pub fn subscribe(&self) -> Subscription<BookingNotification> {
        self.bus.subscribe()
    }

    pub fn register_venue(&self, venue: Venue) {
        self.venues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*venue.id(), venue);
    }

    pub fn register_activity(&self, activity: Activity) {
        self.activities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*activity.id(), activity);
    }

    fn notify(&self, notification: BookingNotification) {
        if self.bus.publish(notification).is_err() {
            warn!("update notification dropped, bus unavailable");
        }
    }

    /// Lazily transition one booking's hold past its window: mark the hold
    /// expired, release its held seats, persist, publish `bookingExpired`.
    ///
    /// Silent on every path. If the store rejects the write the transition
    /// is rolled back and retried by whichever operation touches the
    /// booking next; overlap checks stay correct either way because an
    /// overdue hold never blocks.
    fn expire_entry(&self, id: BookingId, now: DateTime<Utc>) {
        let mut calendar = self.calendar.write().unwrap_or_else(PoisonError::into_inner);
        let Some(snapshot) = calendar.find_by_id(id).ok().cloned() else {
            return;
        };
        if snapshot.is_cancelled() || !snapshot.hold().is_some_and(|h| h.is_expired(now)) {
            return;
        }

        let mut inventories = self
            .inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let inventory_snapshot = inventories.get(&id).cloned();

        let Ok(entry) = calendar.entry_mut(id) else {
            return;
        };
        if let Some(hold) = entry.hold_mut() {
            if hold.expire(now).is_err() {
                return;
            }
        }
        let expired_hold = entry.hold().copied();
        let released = inventories
            .get_mut(&id)
            .map(|inv| inv.release_all_held())
            .unwrap_or_default();

        let record = BookingRecord {
            booking: snapshot.booking().clone(),
            hold: expired_hold,
            cancelled: false,
            seats: inventories
                .get(&id)
                .map(|inv| inv.seats().copied().collect())
                .unwrap_or_default(),
        };
        if let Err(err) = self.store.save_booking(&record) {
            calendar.remove(id);
            calendar.restore_entry(snapshot);
            if let Some(inv) = inventory_snapshot {
                inventories.insert(id, inv);
            }
            warn!(booking = %id, error = %err, "hold expiry not persisted, deferred");
            return;
        }

        let venue_id = record.booking.venue_id();
        let expired_at = expired_hold.map(|h| h.expires_at()).unwrap_or(now);
        drop(inventories);
        drop(calendar);

        info!(booking = %id, released = released.len(), "provisional hold expired");
        self.notify(BookingNotification::BookingExpired(BookingExpired {
            booking_id: id,
            venue_id,
            expired_at,
            occurred_at: now,
        }));
    }

    /// Sweep every overdue hold (range queries touch many bookings at once).
    fn expire_due(&self, now: DateTime<Utc>) {
        let due: Vec<BookingId> = self
            .calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries()
            .filter(|e| !e.is_cancelled() && e.hold().is_some_and(|h| h.is_expired(now)))
            .map(|e| *e.booking().id())
            .collect();
        for id in due {
            self.expire_entry(id, now);
        }
    }

    /// Reject seat mutations on a booking that no longer owns its slot.
    fn ensure_operable(entry: &BookingEntry, id: BookingId) -> DomainResult<()> {
        if entry.is_cancelled() {
            return Err(DomainError::invalid_transition(format!(
                "booking {id} is cancelled"
            )));
        }
        if entry
            .hold()
            .is_some_and(|h| h.state() == HoldState::Expired)
        {
            return Err(DomainError::invalid_transition(format!(
                "booking {id} hold has expired"
            )));
        }
        Ok(())
    }

    fn report_title(&self, booking: &Booking) -> String {
        let activities = self
            .activities
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let venues = self.venues.read().unwrap_or_else(PoisonError::into_inner);
        let activity = activities
            .get(&booking.activity_id())
            .map(|a| a.name().to_string())
            .unwrap_or_else(|| booking.activity_id().to_string());
        let venue = venues
            .get(&booking.venue_id())
            .map(|v| v.name().to_string())
            .unwrap_or_else(|| booking.venue_id().to_string());
        format!("{activity} at {venue}")
    }
}

impl<S: BookingStore> BookingService for BoxOffice<S> {
    fn create_booking(&self, request: CreateBookingRequest) -> DomainResult<BookingId> {
        let now = self.clock.now();
        let scope = self.venue_locks.scope(&request.venue_id);
        let _venue_guard = scope.lock().unwrap_or_else(PoisonError::into_inner);

        let booking = Booking::new(
            BookingId::new(),
            request.venue_id,
            request.activity_id,
            request.start,
            request.end,
            request.created_by,
            request.customer,
            request.pricing,
        )?;
        let id = *booking.id();
        let hold = request.held.then(|| Hold::new(now));

        let mut calendar = self.calendar.write().unwrap_or_else(PoisonError::into_inner);
        calendar.add_booking(booking.clone(), hold, now)?;

        // Compensate the reserved slot if anything after the overlap check
        // fails; a never-committed booking must not linger.
        let inventory = match SeatInventory::with_seats(request.seats) {
            Ok(inventory) => inventory,
            Err(err) => {
                calendar.remove(id);
                return Err(err);
            }
        };
        let record = BookingRecord {
            booking: booking.clone(),
            hold,
            cancelled: false,
            seats: inventory.seats().copied().collect(),
        };
        if let Err(err) = self.store.save_booking(&record) {
            calendar.remove(id);
            return Err(err);
        }
        drop(calendar);

        self.inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, inventory);

        info!(booking = %id, venue = %request.venue_id, held = request.held, "booking created");
        self.notify(BookingNotification::BookingCreated(BookingCreated {
            booking_id: id,
            venue_id: request.venue_id,
            start: booking.start(),
            end: booking.end(),
            held: request.held,
            occurred_at: now,
        }));
        Ok(id)
    }

    fn update_booking(
        &self,
        id: BookingId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<()> {
        let now = self.clock.now();
        self.expire_entry(id, now);

        let venue_id = self
            .calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_by_id(id)?
            .booking()
            .venue_id();
        let scope = self.venue_locks.scope(&venue_id);
        let _venue_guard = scope.lock().unwrap_or_else(PoisonError::into_inner);

        let mut calendar = self.calendar.write().unwrap_or_else(PoisonError::into_inner);
        let snapshot = calendar.find_by_id(id)?.clone();
        Self::ensure_operable(&snapshot, id)?;

        // Read the persisted seats before touching the calendar so a store
        // read failure leaves nothing to roll back.
        let seats = self.store.load_seats(id)?;
        let updated = snapshot.booking().clone().with_interval(start, end)?;
        calendar.update_booking(updated.clone(), now)?;

        let record = BookingRecord {
            booking: updated.clone(),
            hold: snapshot.hold().copied(),
            cancelled: false,
            seats,
        };
        if let Err(err) = self.store.save_booking(&record) {
            calendar.remove(id);
            calendar.restore_entry(snapshot);
            return Err(err);
        }
        drop(calendar);

        info!(booking = %id, "booking rescheduled");
        self.notify(BookingNotification::BookingUpdated(BookingUpdated {
            booking_id: id,
            venue_id,
            start: updated.start(),
            end: updated.end(),
            occurred_at: now,
        }));
        Ok(())
    }

    fn cancel_booking(&self, id: BookingId) -> DomainResult<CancelOutcome> {
        let now = self.clock.now();
        self.expire_entry(id, now);

        let venue_id = self
            .calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_by_id(id)?
            .booking()
            .venue_id();
        let scope = self.venue_locks.scope(&venue_id);
        let _venue_guard = scope.lock().unwrap_or_else(PoisonError::into_inner);

        let mut calendar = self.calendar.write().unwrap_or_else(PoisonError::into_inner);
        let snapshot = calendar.find_by_id(id)?.clone();
        let mut inventories = self
            .inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let inventory_snapshot = inventories.get(&id).cloned();

        let outcome = calendar.cancel_booking(id)?;
        if outcome == CancelOutcome::AlreadyCancelled {
            return Ok(outcome);
        }

        // Seats are released exactly once, on the first cancellation.
        let released = inventories
            .get_mut(&id)
            .map(|inv| inv.release_all_held())
            .unwrap_or_default();

        let entry = calendar.find_by_id(id)?;
        let record = BookingRecord {
            booking: entry.booking().clone(),
            hold: entry.hold().copied(),
            cancelled: true,
            seats: inventories
                .get(&id)
                .map(|inv| inv.seats().copied().collect())
                .unwrap_or_default(),
        };
        if let Err(err) = self.store.save_booking(&record) {
            calendar.remove(id);
            calendar.restore_entry(snapshot);
            if let Some(inv) = inventory_snapshot {
                inventories.insert(id, inv);
            }
            return Err(err);
        }

        info!(booking = %id, released = released.len(), "booking cancelled");
        Ok(CancelOutcome::Cancelled)
    }

    fn confirm_booking(&self, id: BookingId) -> DomainResult<()> {
        let now = self.clock.now();
        self.expire_entry(id, now);

        let mut calendar = self.calendar.write().unwrap_or_else(PoisonError::into_inner);
        let snapshot = calendar.find_by_id(id)?.clone();
        if snapshot.is_cancelled() {
            return Err(DomainError::already_resolved(format!(
                "booking {id} is cancelled"
            )));
        }

        // Read the persisted seats before consuming the hold so a store
        // read failure leaves nothing to roll back.
        let seats = self.store.load_seats(id)?;
        let entry = calendar.entry_mut(id)?;
        let hold = entry.hold_mut().ok_or_else(|| {
            DomainError::invalid_transition(format!("booking {id} has no provisional hold"))
        })?;
        hold.confirm()?;

        let record = BookingRecord {
            booking: snapshot.booking().clone(),
            hold: calendar.find_by_id(id)?.hold().copied(),
            cancelled: false,
            seats,
        };
        if let Err(err) = self.store.save_booking(&record) {
            calendar.remove(id);
            calendar.restore_entry(snapshot);
            return Err(err);
        }
        drop(calendar);

        info!(booking = %id, "hold confirmed");
        Ok(())
    }

    fn find_booking(&self, id: BookingId) -> DomainResult<Booking> {
        let now = self.clock.now();
        self.expire_entry(id, now);
        Ok(self
            .calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_by_id(id)?
            .booking()
            .clone())
    }

    fn find_by_activity(&self, activity_id: ActivityId) -> DomainResult<Vec<Booking>> {
        let now = self.clock.now();
        self.expire_due(now);
        Ok(self
            .calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_by_activity_id(activity_id, now)
            .into_iter()
            .cloned()
            .collect())
    }

    fn get_bookings_by_date_range(
        &self,
        venue: Option<VenueId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let range = TimeInterval::new(start, end)?;
        let now = self.clock.now();
        self.expire_due(now);
        Ok(self
            .calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .bookings_in_range(venue, &range, now)
            .into_iter()
            .cloned()
            .collect())
    }

    fn identify_gaps(&self, venue: VenueId, range: DateRange) -> DomainResult<Vec<DateRange>> {
        let now = self.clock.now();
        self.expire_due(now);
        Ok(self
            .calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .identify_gaps(venue, range, now)
            .collect())
    }
}

impl<S: BookingStore> SeatService for BoxOffice<S> {
    fn check_seat_availability(
        &self,
        booking_id: BookingId,
    ) -> DomainResult<BTreeMap<SeatId, bool>> {
        let now = self.clock.now();
        self.expire_entry(booking_id, now);
        Ok(self
            .inventories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&booking_id)
            .ok_or(DomainError::NotFound)?
            .availability())
    }

    fn hold_group_seats(&self, booking_id: BookingId, seat_ids: &[SeatId]) -> DomainResult<()> {
        let now = self.clock.now();
        self.expire_entry(booking_id, now);

        let scope = self.event_locks.scope(&booking_id);
        let _event_guard = scope.lock().unwrap_or_else(PoisonError::into_inner);

        let calendar = self.calendar.read().unwrap_or_else(PoisonError::into_inner);
        let entry = calendar.find_by_id(booking_id)?;
        Self::ensure_operable(entry, booking_id)?;
        let booking = entry.booking().clone();
        let hold = entry.hold().copied();

        let mut inventories = self
            .inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let inventory = inventories
            .get_mut(&booking_id)
            .ok_or(DomainError::NotFound)?;
        let snapshot = inventory.clone();
        inventory.hold_seats(seat_ids)?;

        let record = BookingRecord {
            booking,
            hold,
            cancelled: false,
            seats: inventory.seats().copied().collect(),
        };
        if let Err(err) = self.store.save_booking(&record) {
            *inventory = snapshot;
            return Err(err);
        }

        info!(booking = %booking_id, seats = seat_ids.len(), "group seats held");
        Ok(())
    }

    fn sell_seats(
        &self,
        booking_id: BookingId,
        seat_ids: &[SeatId],
        discount_code: Option<String>,
        unit_cost: Money,
    ) -> DomainResult<SaleRecord> {
        let now = self.clock.now();
        self.expire_entry(booking_id, now);

        let scope = self.event_locks.scope(&booking_id);
        let _event_guard = scope.lock().unwrap_or_else(PoisonError::into_inner);

        let calendar = self.calendar.read().unwrap_or_else(PoisonError::into_inner);
        let entry = calendar.find_by_id(booking_id)?;
        Self::ensure_operable(entry, booking_id)?;
        let booking = entry.booking().clone();
        let hold = entry.hold().copied();

        let mut inventories = self
            .inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let inventory = inventories
            .get_mut(&booking_id)
            .ok_or(DomainError::NotFound)?;
        let snapshot = inventory.clone();
        let sale = inventory.sell_seats(seat_ids, discount_code)?;

        // One ledger record per seat, priced at the ticket-type-weighted
        // rate of this event's pricing.
        let pricing = booking.pricing();
        let date = now.date_naive();
        let financials: Vec<FinancialRecord> = sale
            .seats
            .iter()
            .map(|(_, ticket_type)| {
                FinancialRecord::sale(
                    booking_id,
                    *ticket_type,
                    pricing.base_price,
                    pricing.discount_factor,
                    unit_cost,
                    date,
                )
            })
            .collect();

        let record = BookingRecord {
            booking,
            hold,
            cancelled: false,
            seats: inventory.seats().copied().collect(),
        };
        let persisted = self.store.save_booking(&record).and_then(|()| {
            financials
                .iter()
                .try_for_each(|r| self.store.save_financial_record(r))
        });
        if let Err(err) = persisted {
            *inventory = snapshot;
            return Err(err);
        }
        drop(inventories);
        drop(calendar);

        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        for financial in financials {
            ledger.append(financial);
        }
        drop(ledger);

        info!(
            booking = %booking_id,
            seats = sale.seats.len(),
            confirmation = %sale.confirmation,
            "seats sold"
        );
        self.notify(BookingNotification::SeatsSold(SeatsSold {
            booking_id,
            seat_ids: sale.seats.iter().map(|(seat_id, _)| *seat_id).collect(),
            confirmation: sale.confirmation,
            occurred_at: now,
        }));
        Ok(sale)
    }

    fn release_seats(&self, booking_id: BookingId, seat_ids: &[SeatId]) -> DomainResult<()> {
        let now = self.clock.now();
        self.expire_entry(booking_id, now);

        let scope = self.event_locks.scope(&booking_id);
        let _event_guard = scope.lock().unwrap_or_else(PoisonError::into_inner);

        let calendar = self.calendar.read().unwrap_or_else(PoisonError::into_inner);
        let entry = calendar.find_by_id(booking_id)?;
        let booking = entry.booking().clone();
        let hold = entry.hold().copied();
        let cancelled = entry.is_cancelled();

        let mut inventories = self
            .inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let inventory = inventories
            .get_mut(&booking_id)
            .ok_or(DomainError::NotFound)?;
        let snapshot = inventory.clone();
        inventory.release_seats(seat_ids)?;

        let record = BookingRecord {
            booking,
            hold,
            cancelled,
            seats: inventory.seats().copied().collect(),
        };
        if let Err(err) = self.store.save_booking(&record) {
            *inventory = snapshot;
            return Err(err);
        }

        info!(booking = %booking_id, seats = seat_ids.len(), "seats released");
        Ok(())
    }

    fn process_refund(
        &self,
        booking_id: BookingId,
        seat_id: SeatId,
        note: Option<String>,
    ) -> DomainResult<Money> {
        let now = self.clock.now();
        self.expire_entry(booking_id, now);

        let scope = self.event_locks.scope(&booking_id);
        let _event_guard = scope.lock().unwrap_or_else(PoisonError::into_inner);

        // Refunds stay possible after cancellation or expiry: a sold seat
        // was paid for regardless of what happened to the slot since.
        let calendar = self.calendar.read().unwrap_or_else(PoisonError::into_inner);
        let entry = calendar.find_by_id(booking_id)?;
        let booking = entry.booking().clone();
        let hold = entry.hold().copied();
        let cancelled = entry.is_cancelled();

        let mut inventories = self
            .inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let inventory = inventories
            .get_mut(&booking_id)
            .ok_or(DomainError::NotFound)?;
        let snapshot = inventory.clone();
        let ticket_type = inventory.refund_seat(seat_id)?;

        // Refund at the rate actually paid for this ticket type.
        let pricing = booking.pricing();
        let amount = pricing
            .base_price
            .apply_factor(ticket_type.pricing_factor(pricing.discount_factor));
        let financial = FinancialRecord::refund(booking_id, ticket_type, amount, now.date_naive(), note);

        let record = BookingRecord {
            booking,
            hold,
            cancelled,
            seats: inventory.seats().copied().collect(),
        };
        let persisted = self
            .store
            .save_booking(&record)
            .and_then(|()| self.store.save_financial_record(&financial));
        if let Err(err) = persisted {
            *inventory = snapshot;
            return Err(err);
        }
        drop(inventories);
        drop(calendar);

        self.ledger
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .append(financial);

        info!(booking = %booking_id, seat = %seat_id, amount = %amount, "refund issued");
        self.notify(BookingNotification::RefundIssued(RefundIssued {
            booking_id,
            seat_id,
            amount,
            occurred_at: now,
        }));
        Ok(amount)
    }

    fn get_held_accessible_seats(&self, booking_id: BookingId) -> DomainResult<Vec<Seat>> {
        let now = self.clock.now();
        self.expire_entry(booking_id, now);
        Ok(self
            .inventories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&booking_id)
            .ok_or(DomainError::NotFound)?
            .held_accessible_seats())
    }
}

impl<S: BookingStore> ReportingService for BoxOffice<S> {
    fn generate_report(&self, booking_id: BookingId) -> DomainResult<Report> {
        let now = self.clock.now();
        self.expire_entry(booking_id, now);

        let booking = self
            .calendar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_by_id(booking_id)?
            .booking()
            .clone();
        let inventory = self
            .inventories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&booking_id)
            .ok_or(DomainError::NotFound)?
            .clone();
        let ledger = self.ledger.read().unwrap_or_else(PoisonError::into_inner);

        let title = self.report_title(&booking);
        Ok(generate_report(title, &booking, &inventory, &ledger))
    }

    fn get_sales_dashboard_data(&self, period: DateRange) -> DashboardData {
        sales_dashboard(
            &self.ledger.read().unwrap_or_else(PoisonError::into_inner),
            period,
        )
    }

    fn get_revenue_breakdown_for_booking(&self, booking_id: BookingId) -> RevenueBreakdown {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .revenue_breakdown(booking_id)
    }

    fn total_revenue_for_period(&self, period: DateRange) -> Money {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .total_revenue_for_period(period)
    }
}
