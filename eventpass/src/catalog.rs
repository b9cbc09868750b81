//! The read-only event catalog.
//!
//! Events come from a JSON fixture file (an array of event objects) or are
//! handed over directly. Once built, the catalog never changes; every derived
//! list is computed from it.

use crate::filter::same_category;
use crate::types::{Event, EventId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The bundled demo fixture
pub const DEMO_FIXTURE: &str = include_str!("../fixtures/events.json");

/// Errors that can occur while building a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The fixture file could not be read
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The fixture is not a valid JSON array of events
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two events share an id
    #[error("Duplicate event id: {0}")]
    DuplicateId(EventId),
}

/// An immutable, id-indexed list of events in fixture order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    events: Vec<Event>,
    index: HashMap<EventId, usize>,
}

impl Catalog {
    /// Builds a catalog, preserving the given order
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two events share an id.
    pub fn from_events(events: Vec<Event>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(events.len());
        for (position, event) in events.iter().enumerate() {
            if index.insert(event.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(event.id.clone()));
            }
        }

        Ok(Self { events, index })
    }

    /// Parses a JSON array of events
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::DuplicateId`] for repeated ids.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        Self::from_events(events)
    }

    /// Loads a JSON fixture file
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Catalog::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), events = catalog.len(), "Loaded event catalog");
        Ok(catalog)
    }

    /// The catalog bundled with the crate
    ///
    /// # Errors
    ///
    /// Only fails if the bundled fixture itself is broken.
    pub fn demo() -> Result<Self, CatalogError> {
        Self::from_json_str(DEMO_FIXTURE)
    }

    /// Looks up an event by id
    #[must_use]
    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.index.get(id).and_then(|&position| self.events.get(position))
    }

    /// Returns true if the catalog has an event with this id
    #[must_use]
    pub fn contains(&self, id: &EventId) -> bool {
        self.index.contains_key(id)
    }

    /// All events in fixture order
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct category names in first-seen order
    ///
    /// Categories differing only by case are reported once, spelled as first seen.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for event in &self.events {
            if !seen.iter().any(|c| same_category(c, &event.category)) {
                seen.push(&event.category);
            }
        }
        seen
    }
}
