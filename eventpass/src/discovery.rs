//! The discovery session: what the user has selected on the event list.
//!
//! [`DiscoveryReducer`] owns the filter selections and the user's location
//! context. The visible list itself is never stored; it is derived on demand
//! with [`DiscoveryState::visible_events`].

use crate::catalog::Catalog;
use crate::filter::{
    filter_and_sort, same_category, DateFilter, FilterContext, FilterCriteria, LocationFilter, PriceFilter,
    SortBy,
};
use crate::location::{GeoPoint, LocationContext};
use crate::types::Event;
use chrono::NaiveDate;
use eventpass_core::{effect::Effect, environment::Clock, reducer::Reducer, SmallVec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// State of one discovery session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryState {
    /// Current selections
    pub criteria: FilterCriteria,
    /// Radius applied when the user picks `nearby`
    pub nearby_radius_km: f64,
    /// Where the user is, as far as we know
    pub location: LocationContext,
}

impl DiscoveryState {
    /// Fresh session with no filters and an unresolved location
    #[must_use]
    pub fn new(fallback_city: impl Into<String>, nearby_radius_km: f64) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            nearby_radius_km,
            location: LocationContext::unavailable(fallback_city),
        }
    }

    /// Current selections
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Filter context for the given reference day
    #[must_use]
    pub fn filter_context(&self, today: NaiveDate) -> FilterContext<'_> {
        FilterContext::new(today, &self.location)
    }

    /// The catalog events that pass the current selections, sorted
    #[must_use]
    pub fn visible_events<'c>(&self, catalog: &'c Catalog, today: NaiveDate) -> Vec<&'c Event> {
        filter_and_sort(catalog.events(), &self.criteria, &self.filter_context(today))
    }

    /// Number of criteria narrowing the list (sort excluded)
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.criteria.active_filter_count(&self.location)
    }

    /// Returns true if `category` is the selected category
    #[must_use]
    pub fn is_category_selected(&self, category: &str) -> bool {
        self.criteria
            .selected_category()
            .is_some_and(|selected| same_category(selected, category))
    }

    /// Date filter summary
    #[must_use]
    pub fn date_label(&self) -> String {
        self.criteria.date_filter.label()
    }

    /// Price filter summary
    #[must_use]
    pub fn price_label(&self) -> String {
        self.criteria.price_filter.label()
    }

    /// Location filter summary
    ///
    /// `current_city` shows the resolved city name.
    #[must_use]
    pub fn location_label(&self) -> String {
        match &self.criteria.location_filter {
            LocationFilter::CurrentCity => self.location.city.clone(),
            other => other.label(),
        }
    }

    /// Sort key summary
    #[must_use]
    pub const fn sort_label(&self) -> &'static str {
        self.criteria.sort_by.label()
    }
}

/// Everything that can change a discovery session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DiscoveryAction {
    /// Select a category, or `None` for all
    SelectCategory {
        /// Category name
        category: Option<String>,
    },
    /// Select a category, or clear it if it is already selected
    ToggleCategory {
        /// Category name
        category: String,
    },
    /// Replace the search text
    SetSearchQuery {
        /// Raw search text
        query: String,
    },
    /// Change the sort key
    SetSortBy {
        /// New key
        sort_by: SortBy,
    },
    /// Change the date filter
    SetDateFilter {
        /// New filter
        filter: DateFilter,
    },
    /// Change the price filter
    SetPriceFilter {
        /// New filter
        filter: PriceFilter,
    },
    /// Change the location filter
    ///
    /// A `Nearby` filter also becomes the session's nearby radius.
    SetLocationFilter {
        /// New filter
        filter: LocationFilter,
    },
    /// Change the nearby radius; ignored unless positive and finite
    SetNearbyRadius {
        /// Radius in kilometres
        radius_km: f64,
    },
    /// Reset every selection to its default
    ClearFilters,
    /// The location collaborator found the user
    LocationResolved {
        /// Device position
        coords: GeoPoint,
        /// Reverse-geocoded city; blank falls back to the configured city
        city: String,
    },
    /// The location collaborator could not find the user
    LocationUnavailable,
}

/// Environment dependencies for the discovery reducer
#[derive(Clone)]
pub struct DiscoveryEnvironment {
    /// Clock providing the reference day
    pub clock: Arc<dyn Clock>,
    /// City assumed when location is unavailable
    pub fallback_city: String,
}

impl DiscoveryEnvironment {
    /// Creates a new `DiscoveryEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, fallback_city: impl Into<String>) -> Self {
        Self {
            clock,
            fallback_city: fallback_city.into(),
        }
    }

    /// The reference day for date filters (UTC)
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }
}

/// Reducer for the discovery session
#[derive(Clone, Debug, Default)]
pub struct DiscoveryReducer;

impl DiscoveryReducer {
    /// Creates a new `DiscoveryReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for DiscoveryReducer {
    type State = DiscoveryState;
    type Action = DiscoveryAction;
    type Environment = DiscoveryEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DiscoveryAction::SelectCategory { category } => {
                state.criteria.category = category;
            },
            DiscoveryAction::ToggleCategory { category } => {
                state.criteria.category = if state.is_category_selected(&category) {
                    None
                } else {
                    Some(category)
                };
            },
            DiscoveryAction::SetSearchQuery { query } => {
                state.criteria.search_query = query;
            },
            DiscoveryAction::SetSortBy { sort_by } => {
                state.criteria.sort_by = sort_by;
            },
            DiscoveryAction::SetDateFilter { filter } => {
                state.criteria.date_filter = filter;
            },
            DiscoveryAction::SetPriceFilter { filter } => {
                state.criteria.price_filter = filter;
            },
            DiscoveryAction::SetLocationFilter { filter } => {
                if let LocationFilter::Nearby { radius_km } = filter {
                    if !is_valid_radius(radius_km) {
                        tracing::warn!(radius_km, "Ignoring nearby filter with invalid radius");
                        return SmallVec::new();
                    }
                    state.nearby_radius_km = radius_km;
                }
                state.criteria.location_filter = filter;
            },
            DiscoveryAction::SetNearbyRadius { radius_km } => {
                if !is_valid_radius(radius_km) {
                    tracing::warn!(radius_km, "Ignoring invalid nearby radius");
                    return SmallVec::new();
                }
                state.nearby_radius_km = radius_km;
                if let LocationFilter::Nearby { radius_km: current } =
                    &mut state.criteria.location_filter
                {
                    *current = radius_km;
                }
            },
            DiscoveryAction::ClearFilters => {
                state.criteria = FilterCriteria::default();
            },
            DiscoveryAction::LocationResolved { coords, city } => {
                let city = if city.trim().is_empty() {
                    env.fallback_city.clone()
                } else {
                    city
                };
                tracing::debug!(%city, "Location resolved");
                state.location = LocationContext::resolved(coords, city);
            },
            DiscoveryAction::LocationUnavailable => {
                tracing::debug!(city = %env.fallback_city, "Location unavailable, using fallback city");
                state.location = LocationContext::unavailable(env.fallback_city.clone());
            },
        }

        SmallVec::new()
    }
}

fn is_valid_radius(radius_km: f64) -> bool {
    radius_km.is_finite() && radius_km > 0.0
}
