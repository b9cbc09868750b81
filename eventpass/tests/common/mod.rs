//! Shared fixtures for the integration tests.

#![allow(dead_code)] // Not every test binary uses every helper
#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use eventpass::{Event, EventId, EventLocation, GeoPoint};

pub const STOCKHOLM: GeoPoint = GeoPoint::new(59.3293, 18.0686);

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builder for test events with Stockholm defaults
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            event: Event {
                id: EventId::from(id),
                title: format!("Event {id}"),
                description: String::new(),
                date: day(2026, 10, 18),
                start_time: "19:00".to_string(),
                end_time: "22:00".to_string(),
                location: EventLocation {
                    name: "Venue".to_string(),
                    address: "Drottninggatan 1, Stockholm".to_string(),
                    latitude: STOCKHOLM.latitude,
                    longitude: STOCKHOLM.longitude,
                },
                category: "Music".to_string(),
                image_url: None,
                price: None,
                organizer: "Organizer".to_string(),
                attendee_count: 0,
                max_attendees: None,
                tags: Vec::new(),
                age_restriction: None,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.event.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.event.description = description.to_string();
        self
    }

    pub fn organizer(mut self, organizer: &str) -> Self {
        self.event.organizer = organizer.to_string();
        self
    }

    pub fn venue(mut self, name: &str) -> Self {
        self.event.location.name = name.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.event.category = category.to_string();
        self
    }

    pub fn price(mut self, price: Option<f64>) -> Self {
        self.event.price = price;
        self
    }

    pub fn on(mut self, date: NaiveDate, start_time: &str) -> Self {
        self.event.date = date;
        self.event.start_time = start_time.to_string();
        self
    }

    pub fn attendees(mut self, count: u32) -> Self {
        self.event.attendee_count = count;
        self
    }

    pub fn at(mut self, address: &str, coords: GeoPoint) -> Self {
        self.event.location.address = address.to_string();
        self.event.location.latitude = coords.latitude;
        self.event.location.longitude = coords.longitude;
        self
    }

    pub fn build(self) -> Event {
        self.event
    }
}

pub fn ids(events: &[&Event]) -> Vec<String> {
    events.iter().map(|event| event.id.to_string()).collect()
}
