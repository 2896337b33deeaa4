//! Venues and activities: the static catalog bookings refer to.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::{ActivityId, VenueId};

/// Venue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueCategory {
    Hall,
    Theatre,
    Cinema,
    ConferenceRoom,
}

/// A bookable room or hall.
///
/// Immutable once created; a capacity change is modeled as a new venue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    id: VenueId,
    name: String,
    category: VenueCategory,
    capacity: u32,
}

impl Venue {
    pub fn new(id: VenueId, name: impl Into<String>, category: VenueCategory, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            capacity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> VenueCategory {
        self.category
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

impl Entity for Venue {
    type Id = VenueId;

    fn id(&self) -> &VenueId {
        &self.id
    }
}

/// Type-specific activity details.
///
/// A tagged variant rather than subtypes: the only difference between
/// shows, films and meetings is data shape, not behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActivityKind {
    Show { rating: String },
    Film { year: i32, rating: String },
    Meeting { organizer: String },
}

/// A time-bounded activity hosted at a venue (show, film, or meeting).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    id: ActivityId,
    name: String,
    kind: ActivityKind,
}

impl Activity {
    pub fn new(id: ActivityId, name: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ActivityKind {
        &self.kind
    }
}

impl Entity for Activity {
    type Id = ActivityId;

    fn id(&self) -> &ActivityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_kind_serializes_with_kind_tag() {
        let activity = Activity::new(
            ActivityId::new(),
            "Evening Screening",
            ActivityKind::Film {
                year: 1972,
                rating: "PG".to_string(),
            },
        );
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["kind"]["kind"], "film");
        assert_eq!(json["kind"]["year"], 1972);
    }
}
