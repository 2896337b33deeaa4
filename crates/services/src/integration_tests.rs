//! End-to-end flows across calendar, seats, holds, ledger and reporting.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use stagehall_calendar::CancelOutcome;
use stagehall_core::{
    Activity, ActivityId, ActivityKind, CustomerId, DateRange, DomainError, Money, Pricing, SeatId,
    StaffId, TicketType, Venue, VenueCategory, VenueId,
};
use stagehall_events::BookingNotification;

use crate::api::{BookingService, CreateBookingRequest, ReportingService, SeatService};
use crate::box_office::BoxOffice;
use crate::clock::FixedClock;
use crate::store::InMemoryStore;

fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn date(m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn office_at(
    now: DateTime<Utc>,
) -> (
    BoxOffice<Arc<InMemoryStore>>,
    Arc<InMemoryStore>,
    Arc<FixedClock>,
) {
    stagehall_observability::init();
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::at(now));
    let office = BoxOffice::open(store.clone(), clock.clone()).unwrap();
    (office, store, clock)
}

fn row_of(count: u32, ticket_type: TicketType) -> Vec<(SeatId, TicketType)> {
    (1..=count).map(|n| (SeatId::new(1, n), ticket_type)).collect()
}

fn request(
    venue_id: VenueId,
    activity_id: ActivityId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    held: bool,
    seats: Vec<(SeatId, TicketType)>,
) -> CreateBookingRequest {
    CreateBookingRequest {
        venue_id,
        activity_id,
        start,
        end,
        created_by: StaffId::new(),
        customer: CustomerId::new(),
        pricing: Pricing::new(Money(1000), 0.85).unwrap(),
        held,
        seats,
    }
}

#[test]
fn full_lifecycle_from_booking_to_report() {
    let (office, _store, _clock) = office_at(ts(2025, 3, 1, 9));
    let venue_id = VenueId::new();
    let activity_id = ActivityId::new();
    office.register_venue(Venue::new(venue_id, "Main Hall", VenueCategory::Hall, 200));
    office.register_activity(Activity::new(
        activity_id,
        "Gala Night",
        ActivityKind::Show { rating: "PG".to_string() },
    ));

    let id = office
        .create_booking(request(
            venue_id,
            activity_id,
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            false,
            row_of(5, TicketType::Discounted),
        ))
        .unwrap();

    let seat_ids: Vec<SeatId> = (1..=5).map(|n| SeatId::new(1, n)).collect();
    office.hold_group_seats(id, &seat_ids).unwrap();
    let sale = office
        .sell_seats(id, &seat_ids, Some("MATINEE".to_string()), Money(100))
        .unwrap();
    assert_eq!(sale.seats.len(), 5);

    let refunded = office
        .process_refund(id, SeatId::new(1, 5), Some("customer illness".to_string()))
        .unwrap();
    // 10.00 at the 0.85 discounted rate.
    assert_eq!(refunded, Money(850));

    let report = office.generate_report(id).unwrap();
    assert_eq!(report.title, "Gala Night at Main Hall");
    assert_eq!(report.sold[&TicketType::Discounted], 4);
    assert_eq!(report.refunded[&TicketType::Discounted], 1);
    // 4 x 10.00 x 0.85 = 34.00
    assert_eq!(report.revenue(), Money(3400));
    assert_eq!(report.refund_total(), Money(850));
    assert_eq!(report.refund_notes, vec!["customer illness"]);

    let breakdown = office.get_revenue_breakdown_for_booking(id);
    assert_eq!(breakdown.sales_by_type[&TicketType::Discounted], Money(4250));
    assert_eq!(breakdown.refunds_by_type[&TicketType::Discounted], Money(850));
    assert_eq!(breakdown.revenue, Money(3400));

    let period = DateRange::new(date(3, 1), date(3, 31)).unwrap();
    assert_eq!(office.total_revenue_for_period(period), Money(3400));
    let dashboard = office.get_sales_dashboard_data(period);
    assert_eq!(dashboard.sales, 5);
    assert_eq!(dashboard.refunds, 1);
    assert_eq!(dashboard.revenue, Money(3400));
}

#[test]
fn provisional_hold_expires_lazily_after_twenty_eight_days() {
    let (office, _store, clock) = office_at(ts(2025, 3, 1, 0));
    let venue_id = VenueId::new();
    let activity_id = ActivityId::new();

    let id = office
        .create_booking(request(
            venue_id,
            activity_id,
            ts(2025, 6, 1, 19),
            ts(2025, 6, 1, 22),
            true,
            row_of(3, TicketType::General),
        ))
        .unwrap();
    let seat_ids: Vec<SeatId> = (1..=3).map(|n| SeatId::new(1, n)).collect();
    office.hold_group_seats(id, &seat_ids).unwrap();

    // Day 28 (2025-03-29): still inside the window, the slot is blocked.
    clock.set(ts(2025, 3, 29, 0));
    let err = office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 6, 1, 20),
            ts(2025, 6, 1, 23),
            false,
            Vec::new(),
        ))
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Day 29: the hold lapses on first touch, seats come back, and the
    // expiry notification goes out.
    let updates = office.subscribe();
    clock.set(ts(2025, 3, 30, 0));
    let range = office
        .get_bookings_by_date_range(Some(venue_id), ts(2025, 6, 1, 0), ts(2025, 6, 2, 0))
        .unwrap();
    assert!(range.is_empty());

    match updates.try_recv().unwrap() {
        BookingNotification::BookingExpired(e) => {
            assert_eq!(e.booking_id, id);
            assert_eq!(e.expired_at, ts(2025, 3, 29, 0));
        }
        other => panic!("expected bookingExpired, got {other:?}"),
    }

    let availability = office.check_seat_availability(id).unwrap();
    assert!(availability.values().all(|a| *a), "held seats released");

    // Seat mutations on the lapsed booking are rejected.
    let err = office.sell_seats(id, &seat_ids, None, Money(0)).unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));

    // The freed slot can be booked again.
    office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 6, 1, 20),
            ts(2025, 6, 1, 23),
            false,
            Vec::new(),
        ))
        .unwrap();
}

#[test]
fn confirmed_hold_never_expires() {
    let (office, _store, clock) = office_at(ts(2025, 3, 1, 0));
    let venue_id = VenueId::new();

    let id = office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 6, 1, 19),
            ts(2025, 6, 1, 22),
            true,
            Vec::new(),
        ))
        .unwrap();
    office.confirm_booking(id).unwrap();

    clock.set(ts(2025, 5, 1, 0));
    let err = office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 6, 1, 20),
            ts(2025, 6, 1, 23),
            false,
            Vec::new(),
        ))
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Confirming twice is rejected as already resolved.
    let err = office.confirm_booking(id).unwrap_err();
    assert!(matches!(err, DomainError::AlreadyResolved(_)));
}

#[test]
fn cancellation_releases_seats_once_and_is_idempotent() {
    let (office, _store, _clock) = office_at(ts(2025, 3, 1, 9));
    let venue_id = VenueId::new();

    let id = office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            false,
            row_of(4, TicketType::General),
        ))
        .unwrap();
    let seat_ids: Vec<SeatId> = (1..=4).map(|n| SeatId::new(1, n)).collect();
    office.hold_group_seats(id, &seat_ids).unwrap();

    assert_eq!(office.cancel_booking(id).unwrap(), CancelOutcome::Cancelled);
    assert_eq!(
        office.cancel_booking(id).unwrap(),
        CancelOutcome::AlreadyCancelled
    );

    let availability = office.check_seat_availability(id).unwrap();
    assert!(availability.values().all(|a| *a));

    // The tombstoned entry no longer blocks its slot.
    office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 3, 7, 20),
            ts(2025, 3, 7, 23),
            false,
            Vec::new(),
        ))
        .unwrap();

    // And it rejects further lifecycle or seat mutations.
    let err = office
        .update_booking(id, ts(2025, 3, 8, 19), ts(2025, 3, 8, 22))
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
    let err = office.hold_group_seats(id, &seat_ids).unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[test]
fn store_failure_rolls_back_booking_creation() {
    let (office, store, _clock) = office_at(ts(2025, 3, 1, 9));
    let venue_id = VenueId::new();

    store.fail_writes(true);
    let err = office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            false,
            Vec::new(),
        ))
        .unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));

    // The slot was compensated: the same interval books cleanly afterwards.
    store.fail_writes(false);
    office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            false,
            Vec::new(),
        ))
        .unwrap();
}

#[test]
fn store_failure_rolls_back_seat_mutations() {
    let (office, store, _clock) = office_at(ts(2025, 3, 1, 9));

    let id = office
        .create_booking(request(
            VenueId::new(),
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            false,
            row_of(2, TicketType::General),
        ))
        .unwrap();
    let seat_ids: Vec<SeatId> = (1..=2).map(|n| SeatId::new(1, n)).collect();

    store.fail_writes(true);
    let err = office.hold_group_seats(id, &seat_ids).unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));
    store.fail_writes(false);

    // No partial hold survived the failed write.
    let availability = office.check_seat_availability(id).unwrap();
    assert!(availability.values().all(|a| *a));
    office.hold_group_seats(id, &seat_ids).unwrap();
}

#[test]
fn store_read_failure_leaves_the_booking_untouched() {
    let (office, store, _clock) = office_at(ts(2025, 3, 1, 9));

    let id = office
        .create_booking(request(
            VenueId::new(),
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            true,
            row_of(2, TicketType::General),
        ))
        .unwrap();

    store.fail_reads(true);
    let err = office
        .update_booking(id, ts(2025, 3, 8, 19), ts(2025, 3, 8, 22))
        .unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));
    let err = office.confirm_booking(id).unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));
    store.fail_reads(false);

    // The failed reschedule did not move the interval.
    let booking = office.find_booking(id).unwrap();
    assert_eq!(booking.start(), ts(2025, 3, 7, 19));
    assert_eq!(booking.end(), ts(2025, 3, 7, 22));

    // The failed confirm did not consume the hold.
    office.confirm_booking(id).unwrap();
}

#[test]
fn group_hold_limit_applies_through_the_service() {
    let (office, _store, _clock) = office_at(ts(2025, 3, 1, 9));

    let id = office
        .create_booking(request(
            VenueId::new(),
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            false,
            row_of(13, TicketType::General),
        ))
        .unwrap();
    let seat_ids: Vec<SeatId> = (1..=13).map(|n| SeatId::new(1, n)).collect();

    let err = office.hold_group_seats(id, &seat_ids).unwrap_err();
    match err {
        DomainError::GroupSizeExceeded { requested: 13, max: 12 } => {}
        other => panic!("expected GroupSizeExceeded, got {other:?}"),
    }
}

#[test]
fn committed_mutations_publish_typed_notifications() {
    let (office, _store, _clock) = office_at(ts(2025, 3, 1, 9));
    let updates = office.subscribe();
    let venue_id = VenueId::new();

    let id = office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            true,
            row_of(2, TicketType::General),
        ))
        .unwrap();
    match updates.try_recv().unwrap() {
        BookingNotification::BookingCreated(e) => {
            assert_eq!(e.booking_id, id);
            assert_eq!(e.venue_id, venue_id);
            assert!(e.held);
        }
        other => panic!("expected bookingCreated, got {other:?}"),
    }

    office
        .update_booking(id, ts(2025, 3, 8, 19), ts(2025, 3, 8, 22))
        .unwrap();
    match updates.try_recv().unwrap() {
        BookingNotification::BookingUpdated(e) => {
            assert_eq!(e.start, ts(2025, 3, 8, 19));
        }
        other => panic!("expected bookingUpdated, got {other:?}"),
    }

    let seat_ids = vec![SeatId::new(1, 1), SeatId::new(1, 2)];
    let sale = office.sell_seats(id, &seat_ids, None, Money(0)).unwrap();
    match updates.try_recv().unwrap() {
        BookingNotification::SeatsSold(e) => {
            assert_eq!(e.seat_ids, seat_ids);
            assert_eq!(e.confirmation, sale.confirmation);
        }
        other => panic!("expected seatsSold, got {other:?}"),
    }

    office.process_refund(id, SeatId::new(1, 1), None).unwrap();
    match updates.try_recv().unwrap() {
        BookingNotification::RefundIssued(e) => {
            assert_eq!(e.seat_id, SeatId::new(1, 1));
            assert_eq!(e.amount, Money(1000));
        }
        other => panic!("expected refundIssued, got {other:?}"),
    }
}

#[test]
fn reopening_rehydrates_calendar_and_seat_state() {
    let start = ts(2025, 3, 1, 9);
    let (office, store, clock) = office_at(start);
    let venue_id = VenueId::new();

    let id = office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            false,
            row_of(2, TicketType::General),
        ))
        .unwrap();
    office
        .sell_seats(id, &[SeatId::new(1, 1)], None, Money(0))
        .unwrap();
    drop(office);

    let reopened = BoxOffice::open(store, clock).unwrap();
    let booking = reopened.find_booking(id).unwrap();
    assert_eq!(booking.venue_id(), venue_id);

    let availability = reopened.check_seat_availability(id).unwrap();
    assert!(!availability[&SeatId::new(1, 1)], "sold seat stays sold");
    assert!(availability[&SeatId::new(1, 2)]);

    // The restored entry still defends its slot.
    let err = reopened
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 3, 7, 20),
            ts(2025, 3, 7, 23),
            false,
            Vec::new(),
        ))
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[test]
fn gap_analysis_reflects_live_bookings() {
    let (office, _store, _clock) = office_at(ts(2025, 3, 1, 0));
    let venue_id = VenueId::new();

    office
        .create_booking(request(
            venue_id,
            ActivityId::new(),
            ts(2025, 3, 3, 0),
            ts(2025, 3, 4, 23),
            false,
            Vec::new(),
        ))
        .unwrap();

    let range = DateRange::new(date(3, 1), date(3, 10)).unwrap();
    let gaps = office.identify_gaps(venue_id, range).unwrap();
    assert_eq!(
        gaps,
        vec![
            DateRange::new(date(3, 1), date(3, 2)).unwrap(),
            DateRange::new(date(3, 5), date(3, 10)).unwrap(),
        ]
    );
}

proptest::proptest! {
    /// Property: selling any batch of seats and then refunding every one of
    /// them nets period revenue to zero, whatever the ticket-type mix.
    #[test]
    fn full_refunds_net_period_revenue_to_zero(
        types in proptest::collection::vec(
            proptest::sample::select(TicketType::ALL.to_vec()), 1..=8,
        )
    ) {
        let (office, _store, _clock) = office_at(ts(2025, 3, 1, 9));
        let seats: Vec<(SeatId, TicketType)> = types
            .iter()
            .enumerate()
            .map(|(n, t)| (SeatId::new(1, n as u32 + 1), *t))
            .collect();
        let seat_ids: Vec<SeatId> = seats.iter().map(|(id, _)| *id).collect();

        let id = office
            .create_booking(request(
                VenueId::new(),
                ActivityId::new(),
                ts(2025, 3, 7, 19),
                ts(2025, 3, 7, 22),
                false,
                seats,
            ))
            .unwrap();
        office.sell_seats(id, &seat_ids, None, Money(0)).unwrap();
        for seat_id in &seat_ids {
            office.process_refund(id, *seat_id, None).unwrap();
        }

        let period = DateRange::new(date(3, 1), date(3, 31)).unwrap();
        proptest::prop_assert_eq!(office.total_revenue_for_period(period), Money::ZERO);
    }
}

#[test]
fn held_accessible_seats_are_reported() {
    let (office, _store, _clock) = office_at(ts(2025, 3, 1, 9));

    let id = office
        .create_booking(request(
            VenueId::new(),
            ActivityId::new(),
            ts(2025, 3, 7, 19),
            ts(2025, 3, 7, 22),
            false,
            vec![
                (SeatId::new(1, 1), TicketType::Wheelchair),
                (SeatId::new(1, 2), TicketType::Companion),
                (SeatId::new(1, 3), TicketType::General),
            ],
        ))
        .unwrap();
    office
        .hold_group_seats(id, &[SeatId::new(1, 1), SeatId::new(1, 3)])
        .unwrap();

    let accessible = office.get_held_accessible_seats(id).unwrap();
    assert_eq!(accessible.len(), 1);
    assert_eq!(accessible[0].id, SeatId::new(1, 1));
}
