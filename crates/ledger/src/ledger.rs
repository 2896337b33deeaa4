use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stagehall_core::{BookingId, DateRange, Money, TicketType};

/// Whether a record books a sale or a refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Sale,
    Refund,
}

/// One immutable financial record.
///
/// Records are append-only facts: a correction appends a superseding record,
/// it never edits an existing one. Refunds carry negative revenue so period
/// sums net out without special-casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub booking_id: BookingId,
    pub ticket_type: TicketType,
    pub kind: RecordKind,
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl FinancialRecord {
    /// Build a sale record. The discount factor is applied only to
    /// discounted and wheelchair tickets; cost is supplied by the caller
    /// (venue overhead is not computed here).
    pub fn sale(
        booking_id: BookingId,
        ticket_type: TicketType,
        unit_price: Money,
        discount_factor: f64,
        cost: Money,
        date: NaiveDate,
    ) -> Self {
        let revenue = unit_price.apply_factor(ticket_type.pricing_factor(discount_factor));
        Self {
            booking_id,
            ticket_type,
            kind: RecordKind::Sale,
            revenue,
            cost,
            profit: revenue - cost,
            date,
            note: None,
        }
    }

    /// Build a refund record for `amount`, the rate actually paid (so
    /// discounted seats refund at the discounted price, not full price).
    pub fn refund(
        booking_id: BookingId,
        ticket_type: TicketType,
        amount: Money,
        date: NaiveDate,
        note: Option<String>,
    ) -> Self {
        let revenue = Money::ZERO - amount;
        Self {
            booking_id,
            ticket_type,
            kind: RecordKind::Refund,
            revenue,
            cost: Money::ZERO,
            profit: revenue,
            date,
            note,
        }
    }
}

/// Per-booking revenue summary, per ticket type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub sales_by_type: BTreeMap<TicketType, Money>,
    pub refunds_by_type: BTreeMap<TicketType, Money>,
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
}

/// Accumulates per-booking financial records from ticket-type-weighted
/// prices. Independent of the calendar; owns its records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueLedger {
    records: Vec<FinancialRecord>,
    by_booking: HashMap<BookingId, Vec<usize>>,
}

impl RevenueLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one record. Records never change once appended; a correction
    /// appends a superseding record.
    pub fn append(&mut self, record: FinancialRecord) -> &FinancialRecord {
        let index = self.records.len();
        self.by_booking
            .entry(record.booking_id)
            .or_default()
            .push(index);
        self.records.push(record);
        &self.records[index]
    }

    /// Record a sale (see [`FinancialRecord::sale`]).
    pub fn record_sale(
        &mut self,
        booking_id: BookingId,
        ticket_type: TicketType,
        unit_price: Money,
        discount_factor: f64,
        cost: Money,
        date: NaiveDate,
    ) -> &FinancialRecord {
        self.append(FinancialRecord::sale(
            booking_id,
            ticket_type,
            unit_price,
            discount_factor,
            cost,
            date,
        ))
    }

    /// Record a refund (see [`FinancialRecord::refund`]).
    pub fn record_refund(
        &mut self,
        booking_id: BookingId,
        ticket_type: TicketType,
        amount: Money,
        date: NaiveDate,
        note: Option<String>,
    ) -> &FinancialRecord {
        self.append(FinancialRecord::refund(booking_id, ticket_type, amount, date, note))
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn records_for_booking(&self, booking_id: BookingId) -> Vec<&FinancialRecord> {
        self.by_booking
            .get(&booking_id)
            .map(|indices| indices.iter().map(|i| &self.records[*i]).collect())
            .unwrap_or_default()
    }

    /// Net revenue over the inclusive date range (sales minus refunds).
    pub fn total_revenue_for_period(&self, period: DateRange) -> Money {
        self.records
            .iter()
            .filter(|r| period.contains(r.date))
            .map(|r| r.revenue)
            .sum()
    }

    /// Net profit over the inclusive date range.
    pub fn total_profit_for_period(&self, period: DateRange) -> Money {
        self.records
            .iter()
            .filter(|r| period.contains(r.date))
            .map(|r| r.profit)
            .sum()
    }

    /// Per-ticket-type sale and refund sums for one booking.
    pub fn revenue_breakdown(&self, booking_id: BookingId) -> RevenueBreakdown {
        let mut breakdown = RevenueBreakdown::default();
        for record in self.records_for_booking(booking_id) {
            match record.kind {
                RecordKind::Sale => {
                    *breakdown
                        .sales_by_type
                        .entry(record.ticket_type)
                        .or_insert(Money::ZERO) += record.revenue;
                }
                RecordKind::Refund => {
                    // Refund revenue is negative; the breakdown shows the
                    // refunded amount as a positive sum.
                    *breakdown
                        .refunds_by_type
                        .entry(record.ticket_type)
                        .or_insert(Money::ZERO) += Money::ZERO - record.revenue;
                }
            }
            breakdown.revenue = breakdown.revenue + record.revenue;
            breakdown.cost = breakdown.cost + record.cost;
            breakdown.profit = breakdown.profit + record.profit;
        }
        breakdown
    }

    /// Refund notes recorded for one booking, in append order.
    pub fn refund_notes(&self, booking_id: BookingId) -> Vec<String> {
        self.records_for_booking(booking_id)
            .into_iter()
            .filter(|r| r.kind == RecordKind::Refund)
            .filter_map(|r| r.note.clone())
            .collect()
    }
}
