//! The event filter/sort engine.
//!
//! [`filter_and_sort`] is a pure function over read-only events. Every active
//! criterion is a predicate and an event is kept only if all of them pass.
//! The surviving events are then stably sorted by the selected key.
//!
//! Optional inputs that are missing or malformed switch their predicate off
//! instead of rejecting events: an unknown user position disables the
//! `nearby` radius, a custom date range needs both ends, and custom price
//! bounds must both parse as finite numbers.

use crate::location::{GeoPoint, LocationContext};
use crate::types::Event;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default radius for the `nearby` location filter
pub const DEFAULT_RADIUS_KM: f64 = 20.0;

// ============================================================================
// Date
// ============================================================================

/// Calendar filter on the event date
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateFilter {
    /// Any date
    #[default]
    All,
    /// Events on the reference day
    Today,
    /// Events on the day after the reference day
    Tomorrow,
    /// Events from the reference day through seven days later, inclusive
    ThisWeek,
    /// Events inside an inclusive range; inactive unless both ends are set
    Custom {
        /// First day of the range
        from: Option<NaiveDate>,
        /// Last day of the range
        to: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// Builds a custom range from raw `YYYY-MM-DD` input
    ///
    /// Blank or unparseable input leaves that end unset.
    #[must_use]
    pub fn custom_from_input(from: &str, to: &str) -> Self {
        let parse = |raw: &str| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
        Self::Custom {
            from: parse(from),
            to: parse(to),
        }
    }

    /// Returns true if `date` passes this filter relative to `today`
    #[must_use]
    pub fn matches(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let offset = |days| today.checked_add_days(Days::new(days));
        match self {
            Self::All => true,
            Self::Today => date == today,
            Self::Tomorrow => offset(1) == Some(date),
            Self::ThisWeek => date >= today && offset(7).is_none_or(|end| date <= end),
            Self::Custom {
                from: Some(from),
                to: Some(to),
            } => *from <= date && date <= *to,
            Self::Custom { .. } => true,
        }
    }

    /// Returns true unless this filter lets every date through
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(
            self,
            Self::All | Self::Custom { from: None, .. } | Self::Custom { to: None, .. }
        )
    }

    /// Summary text for the filter sheet
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Today => "Today".to_string(),
            Self::Tomorrow => "Tomorrow".to_string(),
            Self::ThisWeek => "This Week".to_string(),
            Self::Custom {
                from: Some(from),
                to: Some(to),
            } => format!("{from} - {to}"),
            Self::All | Self::Custom { .. } => "Any Date".to_string(),
        }
    }
}

// ============================================================================
// Price
// ============================================================================

/// Filter on ticket price; an absent price counts as zero
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PriceFilter {
    /// Any price
    #[default]
    #[serde(rename = "all")]
    All,
    /// Price absent or exactly zero
    #[serde(rename = "free")]
    Free,
    /// `0 < price < 50`
    #[serde(rename = "under_50")]
    Under50,
    /// `50 <= price <= 100`
    #[serde(rename = "50_100")]
    From50To100,
    /// `price > 100`
    #[serde(rename = "over_100")]
    Over100,
    /// Inclusive range typed by the user; inactive unless both bounds parse
    #[serde(rename = "custom")]
    Custom {
        /// Raw lower bound
        min: String,
        /// Raw upper bound
        max: String,
    },
}

impl PriceFilter {
    /// Builds a custom range from raw input
    #[must_use]
    pub fn custom(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self::Custom {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Parsed custom bounds, if this is a custom range and both are finite numbers
    #[must_use]
    pub fn custom_bounds(&self) -> Option<(f64, f64)> {
        let Self::Custom { min, max } = self else {
            return None;
        };
        let parse = |raw: &str| raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        Some((parse(min)?, parse(max)?))
    }

    /// Returns true if an event with this price passes the filter
    #[must_use]
    pub fn matches(&self, price: Option<f64>) -> bool {
        let price = price.unwrap_or(0.0);
        match self {
            Self::All => true,
            Self::Free => price == 0.0,
            Self::Under50 => price > 0.0 && price < 50.0,
            Self::From50To100 => (50.0..=100.0).contains(&price),
            Self::Over100 => price > 100.0,
            Self::Custom { .. } => self
                .custom_bounds()
                .is_none_or(|(min, max)| min <= price && price <= max),
        }
    }

    /// Returns true unless this filter lets every price through
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::All => false,
            Self::Custom { .. } => self.custom_bounds().is_some(),
            _ => true,
        }
    }

    /// Summary text for the filter sheet
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Free => "Free Events".to_string(),
            Self::Under50 => "Under $50".to_string(),
            Self::From50To100 => "$50 - $100".to_string(),
            Self::Over100 => "Over $100".to_string(),
            Self::Custom { min, max } if !min.trim().is_empty() && !max.trim().is_empty() => {
                format!("${} - ${}", min.trim(), max.trim())
            },
            Self::All | Self::Custom { .. } => "Any Price".to_string(),
        }
    }
}

// ============================================================================
// Location
// ============================================================================

/// Filter on where the event takes place
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationFilter {
    /// Anywhere
    #[default]
    All,
    /// Within a great-circle radius of the user; inactive while the user position is unknown
    Nearby {
        /// Radius in kilometres
        radius_km: f64,
    },
    /// Address mentions the user's resolved city
    CurrentCity,
    /// Address mentions one of the preset cities
    City {
        /// City name
        name: String,
    },
    /// Address mentions a city typed by the user
    Custom {
        /// City name
        city: String,
    },
}

impl LocationFilter {
    /// `nearby` with the default radius
    #[must_use]
    pub const fn nearby() -> Self {
        Self::Nearby {
            radius_km: DEFAULT_RADIUS_KM,
        }
    }

    /// Preset city filter
    #[must_use]
    pub fn city(name: impl Into<String>) -> Self {
        Self::City { name: name.into() }
    }

    /// Free-text city filter
    #[must_use]
    pub fn custom(city: impl Into<String>) -> Self {
        Self::Custom { city: city.into() }
    }

    /// Returns true if `event` passes the filter
    #[must_use]
    pub fn matches(&self, event: &Event, ctx: &FilterContext<'_>) -> bool {
        match self {
            Self::All => true,
            Self::Nearby { radius_km } => ctx
                .user_location
                .is_none_or(|user| user.distance_km(&event.coordinates()) <= *radius_km),
            Self::CurrentCity => address_mentions(event, ctx.current_city),
            Self::City { name } => address_mentions(event, name),
            Self::Custom { city } => address_mentions(event, city),
        }
    }

    /// Returns true unless this filter lets every event through
    ///
    /// `nearby` needs a known user position and the city variants need a
    /// non-blank city name.
    #[must_use]
    pub fn is_active(&self, location: &LocationContext) -> bool {
        match self {
            Self::All => false,
            Self::Nearby { .. } => location.coords.is_some(),
            Self::CurrentCity => !location.city.trim().is_empty(),
            Self::City { name: city } | Self::Custom { city } => !city.trim().is_empty(),
        }
    }

    /// Summary text for the filter sheet
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Nearby { radius_km } => format!("Within {radius_km} km"),
            Self::CurrentCity => "Current City".to_string(),
            Self::City { name: city } | Self::Custom { city } if !city.trim().is_empty() => {
                city.trim().to_string()
            },
            Self::All | Self::City { .. } | Self::Custom { .. } => "Any Location".to_string(),
        }
    }
}

/// Blank city names match every address
fn address_mentions(event: &Event, city: &str) -> bool {
    event
        .location
        .address
        .to_lowercase()
        .contains(&city.trim().to_lowercase())
}

/// Category comparison shared by filtering and selection, ignoring case
#[must_use]
pub fn same_category(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

// ============================================================================
// Sort
// ============================================================================

/// Ordering applied after filtering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Earliest start first
    #[default]
    Date,
    /// Cheapest first, absent price as zero
    Price,
    /// Most attendees first
    Popularity,
    /// Closest to the user first; keeps input order while the user position is unknown
    Distance,
}

impl SortBy {
    /// Summary text for the filter sheet
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Price => "Price",
            Self::Popularity => "Popularity",
            Self::Distance => "Distance",
        }
    }
}

// ============================================================================
// Criteria
// ============================================================================

/// Everything the user has selected in the discovery screen
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Selected category; `None`, empty or `"all"` means every category
    pub category: Option<String>,
    /// Free-text search; empty means no search
    pub search_query: String,
    /// Date filter
    pub date_filter: DateFilter,
    /// Price filter
    pub price_filter: PriceFilter,
    /// Location filter
    pub location_filter: LocationFilter,
    /// Sort key
    pub sort_by: SortBy,
}

impl FilterCriteria {
    /// The category actually filtered on, if any
    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && !same_category(c, "all"))
    }

    /// Returns true if the category criterion passes
    #[must_use]
    pub fn matches_category(&self, event: &Event) -> bool {
        self.selected_category()
            .is_none_or(|category| same_category(category, &event.category))
    }

    /// Returns true if the search criterion passes
    ///
    /// The query is matched as-is (no trimming) against title, description,
    /// venue name and organizer, ignoring case.
    #[must_use]
    pub fn matches_search(&self, event: &Event) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let query = self.search_query.to_lowercase();
        [
            &event.title,
            &event.description,
            &event.location.name,
            &event.organizer,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&query))
    }

    /// Returns true if `event` passes every criterion
    #[must_use]
    pub fn matches(&self, event: &Event, ctx: &FilterContext<'_>) -> bool {
        self.matches_category(event)
            && self.matches_search(event)
            && self.date_filter.matches(event.date, ctx.today)
            && self.price_filter.matches(event.price)
            && self.location_filter.matches(event, ctx)
    }

    /// Number of criteria currently narrowing the list (sort excluded)
    ///
    /// Criteria that fail open for `location` are not counted.
    #[must_use]
    pub fn active_filter_count(&self, location: &LocationContext) -> usize {
        [
            self.selected_category().is_some(),
            !self.search_query.is_empty(),
            self.date_filter.is_active(),
            self.price_filter.is_active(),
            self.location_filter.is_active(location),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// Values the engine needs from outside the criteria
#[derive(Clone, Copy, Debug)]
pub struct FilterContext<'a> {
    /// Reference day for `today`, `tomorrow` and `this_week`
    pub today: NaiveDate,
    /// User position, if known
    pub user_location: Option<GeoPoint>,
    /// User's resolved (or fallback) city
    pub current_city: &'a str,
}

impl<'a> FilterContext<'a> {
    /// Context for `today` and the given location
    #[must_use]
    pub fn new(today: NaiveDate, location: &'a LocationContext) -> Self {
        Self {
            today,
            user_location: location.coords,
            current_city: &location.city,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Filters `events` by `criteria` and sorts the result
///
/// Pure and deterministic for fixed inputs. The sort is stable, so events
/// with equal keys keep their input order.
#[must_use]
pub fn filter_and_sort<'e>(
    events: &'e [Event],
    criteria: &FilterCriteria,
    ctx: &FilterContext<'_>,
) -> Vec<&'e Event> {
    let mut matching: Vec<&Event> = events
        .iter()
        .filter(|event| criteria.matches(event, ctx))
        .collect();

    sort_events(&mut matching, criteria.sort_by, ctx);

    tracing::trace!(
        total = events.len(),
        matching = matching.len(),
        sort_by = criteria.sort_by.label(),
        "Filtered events"
    );

    matching
}

/// Stably sorts events in place by `sort_by`
pub fn sort_events(events: &mut [&Event], sort_by: SortBy, ctx: &FilterContext<'_>) {
    match sort_by {
        SortBy::Date => events.sort_by_key(|event| event.starts_at()),
        SortBy::Price => events.sort_by(|a, b| a.price_or_zero().total_cmp(&b.price_or_zero())),
        SortBy::Popularity => events.sort_by(|a, b| b.attendee_count.cmp(&a.attendee_count)),
        SortBy::Distance => {
            if let Some(user) = ctx.user_location {
                events.sort_by(|a, b| compare_distance(&user, a, b));
            }
        },
    }
}

fn compare_distance(user: &GeoPoint, a: &Event, b: &Event) -> Ordering {
    user.distance_km(&a.coordinates())
        .total_cmp(&user.distance_km(&b.coordinates()))
}
