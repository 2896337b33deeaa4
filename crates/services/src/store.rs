//! Persistence seam for the box office. The in-memory implementation backs
//! tests and single-process deployments; a durable backend implements the
//! same trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use stagehall_core::{Booking, BookingId, DomainResult, Entity};
use stagehall_holds::Hold;
use stagehall_ledger::FinancialRecord;
use stagehall_seating::Seat;

/// Durable shape of one calendar entry plus its seat allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking: Booking,
    pub hold: Option<Hold>,
    pub cancelled: bool,
    pub seats: Vec<Seat>,
}

pub trait BookingStore: Send + Sync {
    fn load_bookings(&self) -> DomainResult<Vec<BookingRecord>>;
    fn save_booking(&self, record: &BookingRecord) -> DomainResult<()>;
    fn load_seats(&self, booking_id: BookingId) -> DomainResult<Vec<Seat>>;
    fn save_financial_record(&self, record: &FinancialRecord) -> DomainResult<()>;
}

impl<T> BookingStore for std::sync::Arc<T>
where
    T: BookingStore + ?Sized,
{
    fn load_bookings(&self) -> DomainResult<Vec<BookingRecord>> {
        (**self).load_bookings()
    }

    fn save_booking(&self, record: &BookingRecord) -> DomainResult<()> {
        (**self).save_booking(record)
    }

    fn load_seats(&self, booking_id: BookingId) -> DomainResult<Vec<Seat>> {
        (**self).load_seats(booking_id)
    }

    fn save_financial_record(&self, record: &FinancialRecord) -> DomainResult<()> {
        (**self).save_financial_record(record)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    bookings: RwLock<HashMap<BookingId, BookingRecord>>,
    financials: RwLock<Vec<FinancialRecord>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write return a storage error. Used to
    /// exercise compensation paths.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent read return a storage error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn financial_records(&self) -> Vec<FinancialRecord> {
        self.financials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_writable(&self) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(stagehall_core::DomainError::storage("write rejected"))
        } else {
            Ok(())
        }
    }

    fn check_readable(&self) -> DomainResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(stagehall_core::DomainError::storage("read rejected"))
        } else {
            Ok(())
        }
    }
}

impl BookingStore for InMemoryStore {
    fn load_bookings(&self) -> DomainResult<Vec<BookingRecord>> {
        self.check_readable()?;
        Ok(self
            .bookings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect())
    }

    fn save_booking(&self, record: &BookingRecord) -> DomainResult<()> {
        self.check_writable()?;
        self.bookings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*record.booking.id(), record.clone());
        Ok(())
    }

    fn load_seats(&self, booking_id: BookingId) -> DomainResult<Vec<Seat>> {
        self.check_readable()?;
        Ok(self
            .bookings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&booking_id)
            .map(|r| r.seats.clone())
            .unwrap_or_default())
    }

    fn save_financial_record(&self, record: &FinancialRecord) -> DomainResult<()> {
        self.check_writable()?;
        self.financials
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
