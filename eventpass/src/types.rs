//! Domain types for event discovery.
//!
//! Events are read-only fixture records. Nothing in this crate mutates an
//! [`Event`] after it has been loaded into a [`Catalog`](crate::catalog::Catalog).

use crate::location::GeoPoint;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
///
/// Fixture ids are short strings (`"1"`, `"jazz-night"`), so the id wraps the
/// raw string rather than a UUID.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates an `EventId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Categories the bundled catalog uses, in display order
///
/// Category matching is case-insensitive and the catalog may contain others;
/// this list only seeds the category chips.
pub const CATEGORIES: [&str; 6] = ["Music", "Party", "Conference", "Sports", "Food", "Culture"];

// ============================================================================
// Event
// ============================================================================

/// Where an event takes place
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventLocation {
    /// Venue name (searchable)
    pub name: String,
    /// Free-text street address; city filters match against this
    pub address: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl EventLocation {
    /// The venue coordinates
    #[must_use]
    pub const fn coordinates(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A single event occurrence
///
/// Serialized with camelCase keys, matching the fixture file format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier
    pub id: EventId,
    /// Title (searchable)
    pub title: String,
    /// Long description (searchable)
    pub description: String,
    /// Calendar date of the event
    pub date: NaiveDate,
    /// Start time of day, `HH:MM`
    pub start_time: String,
    /// End time of day, `HH:MM`
    pub end_time: String,
    /// Venue
    pub location: EventLocation,
    /// Category name
    pub category: String,
    /// Cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ticket price; absent means free
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Organizer name (searchable)
    pub organizer: String,
    /// Number of people attending
    pub attendee_count: u32,
    /// Capacity, if limited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
    /// Display tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Display-only age restriction such as `18+`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_restriction: Option<String>,
}

impl Event {
    /// Ticket price, with an absent price treated as zero
    #[must_use]
    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Returns true if the event costs nothing
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.price_or_zero() == 0.0
    }

    /// Date and start time combined
    ///
    /// A start time that is not `HH:MM` (or `HH:MM:SS`) counts as midnight.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        let time = NaiveTime::parse_from_str(&self.start_time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&self.start_time, "%H:%M:%S"))
            .unwrap_or(NaiveTime::MIN);
        self.date.and_time(time)
    }

    /// The venue coordinates
    #[must_use]
    pub const fn coordinates(&self) -> GeoPoint {
        self.location.coordinates()
    }

    /// Remaining capacity, if the event has a limit
    #[must_use]
    pub fn spots_left(&self) -> Option<u32> {
        self.max_attendees
            .map(|max| max.saturating_sub(self.attendee_count))
    }

    /// Returns true if the event has a limit and it has been reached
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.spots_left() == Some(0)
    }
}
