use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stagehall_core::{Booking, DateRange, Money, TicketType};
use stagehall_ledger::{RecordKind, RevenueLedger};
use stagehall_seating::{SeatInventory, SeatStatus};

/// A per-event sales report.
///
/// Derived data only: counts come from the seat inventory, notes from the
/// ledger, and the monetary sums are recomputed from the counts each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub base_price: Money,
    pub discount_factor: f64,
    pub sold: BTreeMap<TicketType, u32>,
    pub refunded: BTreeMap<TicketType, u32>,
    pub refund_notes: Vec<String>,
}

impl Report {
    // Accumulates in i128 so count-times-price products cannot wrap the
    // minor-unit representation.
    fn weighted_sum(&self, counts: &BTreeMap<TicketType, u32>) -> Money {
        let total: i128 = counts
            .iter()
            .map(|(ticket_type, count)| {
                let unit = self
                    .base_price
                    .apply_factor(ticket_type.pricing_factor(self.discount_factor));
                i128::from(unit.minor_units()) * i128::from(*count)
            })
            .sum();
        Money::from_widened(total)
    }

    /// Revenue: for each ticket type, `sold × unit price × factor`, where the
    /// factor applies only to discounted and wheelchair tickets.
    pub fn revenue(&self) -> Money {
        self.weighted_sum(&self.sold)
    }

    /// Refund total, at the rate actually paid per ticket type.
    pub fn refund_total(&self) -> Money {
        self.weighted_sum(&self.refunded)
    }

    pub fn tickets_sold(&self) -> u32 {
        self.sold.values().sum()
    }

    pub fn tickets_refunded(&self) -> u32 {
        self.refunded.values().sum()
    }
}

impl core::fmt::Display for Report {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{} | {} {}", self.title, self.date, self.start_time.format("%H:%M"))?;
        writeln!(
            f,
            "sold {} / refunded {} | revenue {} | refunds {}",
            self.tickets_sold(),
            self.tickets_refunded(),
            self.revenue(),
            self.refund_total(),
        )?;
        for note in &self.refund_notes {
            writeln!(f, "refund note: {note}")?;
        }
        Ok(())
    }
}

/// Build the report for one booking from its inventory and the ledger.
///
/// Purely a read-side projection: safe to call repeatedly, no side effects.
pub fn generate_report(
    title: impl Into<String>,
    booking: &Booking,
    inventory: &SeatInventory,
    ledger: &RevenueLedger,
) -> Report {
    use stagehall_core::Entity;

    let pricing = booking.pricing();
    Report {
        title: title.into(),
        date: booking.start().date_naive(),
        start_time: booking.start(),
        base_price: pricing.base_price,
        discount_factor: pricing.discount_factor,
        sold: inventory.counts_by_type(SeatStatus::Sold),
        refunded: inventory.counts_by_type(SeatStatus::Refunded),
        refund_notes: ledger.refund_notes(*booking.id()),
    }
}

/// Period totals for the sales dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardData {
    pub period: DateRange,
    pub sales: u32,
    pub refunds: u32,
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
}

/// Aggregate the ledger over an inclusive period.
pub fn sales_dashboard(ledger: &RevenueLedger, period: DateRange) -> DashboardData {
    let mut data = DashboardData {
        period,
        sales: 0,
        refunds: 0,
        revenue: Money::ZERO,
        cost: Money::ZERO,
        profit: Money::ZERO,
    };
    for record in ledger.records().iter().filter(|r| period.contains(r.date)) {
        match record.kind {
            RecordKind::Sale => data.sales += 1,
            RecordKind::Refund => data.refunds += 1,
        }
        data.revenue += record.revenue;
        data.cost += record.cost;
        data.profit += record.profit;
    }
    data
}
