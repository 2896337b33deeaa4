//! Identity for catalog and booking records.

/// Anything addressable by a strongly-typed id: venues, activities, bookings.
///
/// Identity follows the id, not the fields; a rescheduled booking is still
/// the same booking.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Whether `other` refers to the same underlying record.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
