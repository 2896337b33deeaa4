//! Monetary amounts and ticket-type pricing.

use serde::{Deserialize, Serialize};

/// Amount in smallest currency unit (e.g., cents).
///
/// Kept as a signed integer so refunds and corrections can be expressed as
/// negative line amounts where a caller needs that; domain operations
/// themselves only produce non-negative amounts.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn minor_units(self) -> i64 {
        self.0
    }

    /// Apply a pricing factor, rounding half-away-from-zero to the nearest
    /// minor unit.
    pub fn apply_factor(self, factor: f64) -> Money {
        Money((self.0 as f64 * factor).round() as i64)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Narrow a widened i128 aggregate back to minor units, saturating at
    /// the representable bounds instead of wrapping.
    pub fn from_widened(total: i128) -> Money {
        Money(total.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }
}

impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl core::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl core::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl core::iter::Sum for Money {
    // Sums widen to i128 so pathological totals saturate instead of
    // overflowing the minor-unit representation.
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        Money::from_widened(iter.map(|m| i128::from(m.0)).sum())
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let units = self.0 / 100;
        let cents = (self.0 % 100).abs();
        write!(f, "{units}.{cents:02}")
    }
}

/// Ticket type attached to a seat; determines the pricing multiplier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    General,
    Discounted,
    Wheelchair,
    Companion,
}

impl TicketType {
    pub const ALL: [TicketType; 4] = [
        TicketType::General,
        TicketType::Discounted,
        TicketType::Wheelchair,
        TicketType::Companion,
    ];

    /// Discounted and accessible (wheelchair) tickets are charged at the
    /// discounted rate; general and companion tickets at full price.
    pub fn discount_applies(self) -> bool {
        matches!(self, TicketType::Discounted | TicketType::Wheelchair)
    }

    /// Effective pricing factor for this ticket type given the event's
    /// discount factor.
    pub fn pricing_factor(self, discount_factor: f64) -> f64 {
        if self.discount_applies() {
            discount_factor
        } else {
            1.0
        }
    }

    /// Whether this ticket type marks an accessible seat (wheelchair space or
    /// its companion seat).
    pub fn is_accessible(self) -> bool {
        matches!(self, TicketType::Wheelchair | TicketType::Companion)
    }
}
