//! Cart state, commands and events.

use super::checkout::{PaymentField, PaymentForm, Receipt};
use crate::catalog::Catalog;
use crate::types::{Event, EventId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payment state of a cart line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Waiting for checkout
    #[default]
    Pending,
    /// Paid
    Paid,
}

/// Tickets for one event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Event the tickets are for
    pub event_id: EventId,
    /// Number of tickets, at least one
    pub quantity: u32,
    /// When the event was first added; later merges keep it
    pub added_date: DateTime<Utc>,
    /// Payment state
    pub status: CartStatus,
}

/// A cart line together with its catalog event
#[derive(Clone, Debug, PartialEq)]
pub struct CartEntry {
    /// The cart line
    pub line: CartLine,
    /// The event it refers to
    pub event: Event,
}

impl CartEntry {
    /// `price * quantity`, absent price as zero
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.event.price_or_zero() * f64::from(self.line.quantity)
    }
}

/// Why a cart command was rejected
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartError {
    /// Adding zero tickets
    #[error("Quantity must be at least 1 for event {event_id}")]
    ZeroQuantity {
        /// Event the command referred to
        event_id: EventId,
    },

    /// Checkout without selecting anything
    #[error("Select at least one event to pay for")]
    NothingSelected,

    /// Checkout of events that are not in the cart
    #[error("Not in cart: {}", join(.event_ids))]
    NotInCart {
        /// Offending ids
        event_ids: Vec<EventId>,
    },

    /// Checkout with blank payment details
    #[error("Missing payment details: {}", join(.fields))]
    MissingPaymentFields {
        /// Blank required fields, in form order
        fields: Vec<PaymentField>,
    },
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// State of the cart
///
/// Lines are kept in insertion order, one per event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    /// Cart lines
    pub lines: Vec<CartLine>,
    /// Why the last command was rejected, cleared by the next accepted one
    pub last_error: Option<CartError>,
    /// Receipt of the most recent checkout
    pub last_receipt: Option<Receipt>,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            last_error: None,
            last_receipt: None,
        }
    }

    /// The line for `event_id`, if any
    #[must_use]
    pub fn line(&self, event_id: &EventId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.event_id == event_id)
    }

    /// Returns true if the cart holds tickets for `event_id`
    #[must_use]
    pub fn is_in_cart(&self, event_id: &EventId) -> bool {
        self.line(event_id).is_some()
    }

    /// Snapshot of every line in insertion order
    #[must_use]
    pub fn cart_items(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Total number of tickets
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Lines joined with their events; lines whose event is not in the catalog are skipped
    #[must_use]
    pub fn entries(&self, catalog: &Catalog) -> Vec<CartEntry> {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog.get(&line.event_id).map(|event| CartEntry {
                    line: line.clone(),
                    event: event.clone(),
                })
            })
            .collect()
    }

    /// Sum of `price * quantity` over the selected lines
    ///
    /// Ids that are not in the cart or not in the catalog contribute nothing,
    /// and a repeated id is counted once.
    #[must_use]
    pub fn total_amount(&self, catalog: &Catalog, selection: &[EventId]) -> f64 {
        self.lines
            .iter()
            .filter(|line| selection.contains(&line.event_id))
            .filter_map(|line| {
                catalog
                    .get(&line.event_id)
                    .map(|event| event.price_or_zero() * f64::from(line.quantity))
            })
            .sum()
    }
}

/// Commands and events for the cart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CartAction {
    // ========== Commands ==========
    /// Command: add tickets, merging with an existing line
    AddToCart {
        /// Event to add
        event_id: EventId,
        /// Tickets to add
        quantity: u32,
    },

    /// Command: drop a line; no-op if absent
    RemoveFromCart {
        /// Event to remove
        event_id: EventId,
    },

    /// Command: settle lines, removing them from the cart
    MarkAsPaid {
        /// Events that were paid for; absent ids are ignored
        event_ids: Vec<EventId>,
    },

    /// Command: pay for the selected lines
    Checkout {
        /// Events to pay for
        selection: Vec<EventId>,
        /// Payment details
        form: PaymentForm,
    },

    // ========== Events ==========
    /// Event: tickets were added
    ItemAdded {
        /// Event added
        event_id: EventId,
        /// Tickets added
        quantity: u32,
        /// When it happened
        added_at: DateTime<Utc>,
    },

    /// Event: a line was removed
    ItemRemoved {
        /// Event removed
        event_id: EventId,
    },

    /// Event: lines were paid and removed
    ItemsPaid {
        /// Events paid
        event_ids: Vec<EventId>,
    },

    /// Event: checkout succeeded
    CheckoutCompleted {
        /// The receipt
        receipt: Receipt,
    },

    /// Event: a command was rejected
    CommandRejected {
        /// Why
        error: CartError,
    },
}
