//! Booking: one time-bounded run of an activity at a venue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{ActivityId, BookingId, CustomerId, StaffId, VenueId};
use crate::interval::TimeInterval;
use crate::money::Money;

/// Per-event pricing: base ticket price plus the factor applied to
/// discounted/accessible ticket types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub base_price: Money,
    pub discount_factor: f64,
}

impl Pricing {
    pub fn new(base_price: Money, discount_factor: f64) -> DomainResult<Self> {
        if !(0.0..=1.0).contains(&discount_factor) {
            return Err(DomainError::validation(format!(
                "discount factor {discount_factor} must be within [0.0, 1.0]"
            )));
        }
        if base_price < Money::ZERO {
            return Err(DomainError::validation("base price must not be negative"));
        }
        Ok(Self {
            base_price,
            discount_factor,
        })
    }
}

/// A booking of a venue for an activity over a closed `[start, end]` interval.
///
/// Invariant: `start <= end`, enforced at construction. The seat set the
/// booking owns lives in its `SeatInventory`; the booking record itself stays
/// a plain value so the calendar can index it cheaply. Hold state is tracked
/// by the hold lifecycle, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    venue_id: VenueId,
    activity_id: ActivityId,
    interval: TimeInterval,
    created_by: StaffId,
    customer: CustomerId,
    pricing: Pricing,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookingId,
        venue_id: VenueId,
        activity_id: ActivityId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        created_by: StaffId,
        customer: CustomerId,
        pricing: Pricing,
    ) -> DomainResult<Self> {
        let interval = TimeInterval::new(start, end)?;
        Ok(Self {
            id,
            venue_id,
            activity_id,
            interval,
            created_by,
            customer,
            pricing,
        })
    }

    pub fn venue_id(&self) -> VenueId {
        self.venue_id
    }

    pub fn activity_id(&self) -> ActivityId {
        self.activity_id
    }

    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.interval.start()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.interval.end()
    }

    pub fn created_by(&self) -> StaffId {
        self.created_by
    }

    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing
    }

    /// Replace the booked interval (used by reschedules after the calendar
    /// has re-validated the overlap rule).
    pub fn with_interval(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        self.interval = TimeInterval::new(start, end)?;
        Ok(self)
    }
}

impl Entity for Booking {
    type Id = BookingId;

    fn id(&self) -> &BookingId {
        &self.id
    }
}
