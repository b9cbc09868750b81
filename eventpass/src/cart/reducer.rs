//! Reducer logic for the cart.
//!
//! Commands are validated, turned into events and applied in place. A
//! rejected command is recorded in `last_error`; an accepted one clears it.
//! Checkout does not touch the lines itself: it records the receipt and
//! dispatches `MarkAsPaid` for the store to feed back.

use super::checkout::Receipt;
use super::types::{CartAction, CartError, CartLine, CartState, CartStatus};
use crate::catalog::Catalog;
use crate::types::EventId;
use eventpass_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Environment dependencies for the cart reducer
#[derive(Clone)]
pub struct CartEnvironment {
    /// Clock for line and receipt timestamps
    pub clock: Arc<dyn Clock>,
    /// Prices for totals
    pub catalog: Arc<Catalog>,
}

impl CartEnvironment {
    /// Creates a new `CartEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, catalog: Arc<Catalog>) -> Self {
        Self { clock, catalog }
    }
}

/// Reducer for the cart
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a `Checkout` command, returning the de-duplicated selection
    fn validate_checkout(
        state: &CartState,
        selection: &[EventId],
        form: &super::checkout::PaymentForm,
    ) -> Result<Vec<EventId>, CartError> {
        if selection.is_empty() {
            return Err(CartError::NothingSelected);
        }

        let mut unique: Vec<EventId> = Vec::with_capacity(selection.len());
        for id in selection {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }

        let missing: Vec<EventId> = unique
            .iter()
            .filter(|id| !state.is_in_cart(id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(CartError::NotInCart { event_ids: missing });
        }

        let fields = form.missing_fields();
        if !fields.is_empty() {
            return Err(CartError::MissingPaymentFields { fields });
        }

        Ok(unique)
    }

    /// Applies an event to state
    fn apply_event(state: &mut CartState, action: &CartAction) {
        match action {
            CartAction::ItemAdded {
                event_id,
                quantity,
                added_at,
            } => {
                if let Some(line) = state.lines.iter_mut().find(|l| &l.event_id == event_id) {
                    line.quantity = line.quantity.saturating_add(*quantity);
                } else {
                    state.lines.push(CartLine {
                        event_id: event_id.clone(),
                        quantity: *quantity,
                        added_date: *added_at,
                        status: CartStatus::Pending,
                    });
                }
                state.last_error = None;
            },
            CartAction::ItemRemoved { event_id } => {
                state.lines.retain(|line| &line.event_id != event_id);
                state.last_error = None;
            },
            CartAction::ItemsPaid { event_ids } => {
                state.lines.retain(|line| !event_ids.contains(&line.event_id));
                state.last_error = None;
            },
            CartAction::CheckoutCompleted { receipt } => {
                state.last_receipt = Some(receipt.clone());
                state.last_error = None;
            },
            CartAction::CommandRejected { error } => {
                state.last_error = Some(error.clone());
            },
            // Commands are not applied to state
            CartAction::AddToCart { .. }
            | CartAction::RemoveFromCart { .. }
            | CartAction::MarkAsPaid { .. }
            | CartAction::Checkout { .. } => {},
        }
    }

    fn reject(state: &mut CartState, error: CartError) -> SmallVec<[Effect<CartAction>; 4]> {
        tracing::warn!(%error, "Cart command rejected");
        Self::apply_event(state, &CartAction::CommandRejected { error });
        SmallVec::new()
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            CartAction::AddToCart { event_id, quantity } => {
                if quantity == 0 {
                    return Self::reject(state, CartError::ZeroQuantity { event_id });
                }

                let event = CartAction::ItemAdded {
                    event_id,
                    quantity,
                    added_at: env.clock.now(),
                };
                Self::apply_event(state, &event);
                SmallVec::new()
            },

            CartAction::RemoveFromCart { event_id } => {
                Self::apply_event(state, &CartAction::ItemRemoved { event_id });
                SmallVec::new()
            },

            CartAction::MarkAsPaid { event_ids } => {
                Self::apply_event(state, &CartAction::ItemsPaid { event_ids });
                SmallVec::new()
            },

            CartAction::Checkout { selection, form } => {
                let selection = match Self::validate_checkout(state, &selection, &form) {
                    Ok(selection) => selection,
                    Err(error) => return Self::reject(state, error),
                };

                let receipt = Receipt {
                    total_amount: state.total_amount(&env.catalog, &selection),
                    event_ids: selection.clone(),
                    paid_at: env.clock.now(),
                };
                tracing::info!(
                    events = receipt.event_ids.len(),
                    total = receipt.total_amount,
                    card = %form.masked_card_number(),
                    "Checkout completed"
                );
                Self::apply_event(state, &CartAction::CheckoutCompleted { receipt });

                smallvec![Effect::dispatch(CartAction::MarkAsPaid {
                    event_ids: selection,
                })]
            },

            // ========== Events ==========
            event @ (CartAction::ItemAdded { .. }
            | CartAction::ItemRemoved { .. }
            | CartAction::ItemsPaid { .. }
            | CartAction::CheckoutCompleted { .. }
            | CartAction::CommandRejected { .. }) => {
                Self::apply_event(state, &event);
                SmallVec::new()
            },
        }
    }
}
