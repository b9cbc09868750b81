//! The ticket cart.
//!
//! [`CartReducer`] holds the rules. [`Cart`] wraps it in a [`Store`] owned by
//! the caller and exposes the cart operations as plain methods. Every accepted
//! or rejected command is broadcast to [`Cart::subscribe`] receivers once its
//! state change has been applied.

mod checkout;
mod reducer;
mod types;

pub use checkout::{PaymentField, PaymentForm, Receipt};
pub use reducer::{CartEnvironment, CartReducer};
pub use types::{CartAction, CartEntry, CartError, CartLine, CartState, CartStatus};

use crate::types::EventId;
use eventpass_runtime::{Store, StoreError};
use thiserror::Error;
use tokio::sync::broadcast;

/// Why a cart operation did not go through
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartCommandError {
    /// The cart rejected the command
    #[error(transparent)]
    Rejected(#[from] CartError),

    /// The store failed to run the command
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A caller-owned cart
pub struct Cart {
    store: Store<CartState, CartAction, CartEnvironment, CartReducer>,
}

impl Cart {
    /// Creates an empty cart
    #[must_use]
    pub fn new(environment: CartEnvironment) -> Self {
        Self {
            store: Store::new(CartState::new(), CartReducer::new(), environment),
        }
    }

    /// Creates an empty cart whose subscribers buffer `capacity` notifications
    #[must_use]
    pub fn with_broadcast_capacity(environment: CartEnvironment, capacity: usize) -> Self {
        Self {
            store: Store::with_broadcast_capacity(
                CartState::new(),
                CartReducer::new(),
                environment,
                capacity,
            ),
        }
    }

    fn send(&mut self, action: CartAction) -> Result<(), CartCommandError> {
        self.store.send(action)?;
        match self.store.state(|s| s.last_error.clone()) {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    /// Adds `quantity` tickets, merging with an existing line
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn add_to_cart(
        &mut self,
        event_id: impl Into<EventId>,
        quantity: u32,
    ) -> Result<(), CartCommandError> {
        self.send(CartAction::AddToCart {
            event_id: event_id.into(),
            quantity,
        })
    }

    /// Removes the line for `event_id`; does nothing if there is none
    ///
    /// # Errors
    ///
    /// Only fails if the store itself fails.
    pub fn remove_from_cart(&mut self, event_id: impl Into<EventId>) -> Result<(), CartCommandError> {
        self.send(CartAction::RemoveFromCart {
            event_id: event_id.into(),
        })
    }

    /// Removes every line whose event is in `event_ids`
    ///
    /// # Errors
    ///
    /// Only fails if the store itself fails.
    pub fn mark_as_paid(&mut self, event_ids: Vec<EventId>) -> Result<(), CartCommandError> {
        self.send(CartAction::MarkAsPaid { event_ids })
    }

    /// Pays for the selected lines and removes them from the cart
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] describing why checkout was refused: nothing
    /// selected, selection not in the cart, or blank payment details.
    pub fn checkout(
        &mut self,
        selection: Vec<EventId>,
        form: PaymentForm,
    ) -> Result<Receipt, CartCommandError> {
        self.send(CartAction::Checkout { selection, form })?;
        self.store
            .state(|s| s.last_receipt.clone())
            .ok_or(CartCommandError::Rejected(CartError::NothingSelected))
    }

    /// Snapshot of every line in insertion order
    #[must_use]
    pub fn cart_items(&self) -> Vec<CartLine> {
        self.store.state(CartState::cart_items)
    }

    /// Total number of tickets
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.store.state(CartState::cart_count)
    }

    /// Returns true if the cart holds tickets for `event_id`
    #[must_use]
    pub fn is_in_cart(&self, event_id: &EventId) -> bool {
        self.store.state(|s| s.is_in_cart(event_id))
    }

    /// Sum of `price * quantity` over the selected lines
    #[must_use]
    pub fn total_amount(&self, selection: &[EventId]) -> f64 {
        let catalog = &self.store.environment().catalog;
        self.store.state(|s| s.total_amount(catalog, selection))
    }

    /// Lines joined with their catalog events
    #[must_use]
    pub fn entries(&self) -> Vec<CartEntry> {
        let catalog = &self.store.environment().catalog;
        self.store.state(|s| s.entries(catalog))
    }

    /// Receipt of the most recent checkout
    #[must_use]
    pub fn last_receipt(&self) -> Option<Receipt> {
        self.store.state(|s| s.last_receipt.clone())
    }

    /// Subscribe to cart changes
    ///
    /// Each received action has already been applied; read the new values
    /// from the cart.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartAction> {
        self.store.subscribe_actions()
    }
}
