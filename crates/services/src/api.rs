//! Capability-tagged service interfaces.
//!
//! Callers depend on the capability they need (booking lifecycle, seat
//! operations, reporting) rather than on the concrete box office. The
//! box office implements all three.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use stagehall_calendar::CancelOutcome;
use stagehall_core::{
    ActivityId, Booking, BookingId, CustomerId, DateRange, DomainResult, Money, Pricing, SeatId,
    StaffId, TicketType, VenueId,
};
use stagehall_ledger::RevenueBreakdown;
use stagehall_reporting::{DashboardData, Report};
use stagehall_seating::{SaleRecord, Seat};

/// Everything needed to open a booking: the slot, who booked it, the
/// event's pricing, whether it starts as a provisional hold, and the seat
/// layout allocated to it.
#[derive(Debug, Clone)]
pub struct CreateBookingRequest {
    pub venue_id: VenueId,
    pub activity_id: ActivityId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_by: StaffId,
    pub customer: CustomerId,
    pub pricing: Pricing,
    pub held: bool,
    pub seats: Vec<(SeatId, TicketType)>,
}

/// Booking lifecycle operations.
///
/// Every operation that touches a held booking first applies lazy hold
/// expiry, so callers always observe post-expiry state.
pub trait BookingService {
    fn create_booking(&self, request: CreateBookingRequest) -> DomainResult<BookingId>;

    /// Reschedule a booking, re-validating the overlap rule.
    fn update_booking(
        &self,
        id: BookingId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// Tombstone a booking and release its held seats. Idempotent.
    fn cancel_booking(&self, id: BookingId) -> DomainResult<CancelOutcome>;

    /// Confirm a provisional hold before its window closes.
    fn confirm_booking(&self, id: BookingId) -> DomainResult<()>;

    fn find_booking(&self, id: BookingId) -> DomainResult<Booking>;

    fn find_by_activity(&self, activity_id: ActivityId) -> DomainResult<Vec<Booking>>;

    fn get_bookings_by_date_range(
        &self,
        venue: Option<VenueId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>>;

    /// Free day-granular sub-ranges of `range` for one venue.
    fn identify_gaps(&self, venue: VenueId, range: DateRange) -> DomainResult<Vec<DateRange>>;
}

/// Seat inventory operations for one booking's event.
pub trait SeatService {
    fn check_seat_availability(&self, booking_id: BookingId)
    -> DomainResult<BTreeMap<SeatId, bool>>;

    /// Atomically hold a group of seats (all-or-nothing, bounded group size).
    fn hold_group_seats(&self, booking_id: BookingId, seat_ids: &[SeatId]) -> DomainResult<()>;

    /// Sell a batch of seats, recording one ledger entry per seat at the
    /// ticket-type-weighted price. `unit_cost` is the per-seat cost booked
    /// against the sale.
    fn sell_seats(
        &self,
        booking_id: BookingId,
        seat_ids: &[SeatId],
        discount_code: Option<String>,
        unit_cost: Money,
    ) -> DomainResult<SaleRecord>;

    fn release_seats(&self, booking_id: BookingId, seat_ids: &[SeatId]) -> DomainResult<()>;

    /// Refund one sold seat at the rate actually paid; returns the refunded
    /// amount.
    fn process_refund(
        &self,
        booking_id: BookingId,
        seat_id: SeatId,
        note: Option<String>,
    ) -> DomainResult<Money>;

    fn get_held_accessible_seats(&self, booking_id: BookingId) -> DomainResult<Vec<Seat>>;
}

/// Read-side reporting over the calendar, inventories and ledger.
pub trait ReportingService {
    fn generate_report(&self, booking_id: BookingId) -> DomainResult<Report>;

    fn get_sales_dashboard_data(&self, period: DateRange) -> DashboardData;

    fn get_revenue_breakdown_for_booking(&self, booking_id: BookingId) -> RevenueBreakdown;

    fn total_revenue_for_period(&self, period: DateRange) -> Money;
}
