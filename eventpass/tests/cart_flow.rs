//! Cart behaviour through the store, as a UI layer would drive it.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use eventpass::{
    Cart, CartAction, CartCommandError, CartEnvironment, CartError, CartReducer, CartState,
    Catalog, EventId, PaymentForm,
};
use eventpass_runtime::Store;
use eventpass_testing::{test_clock, SteppingClock};
use proptest::prelude::*;
use std::sync::Arc;

fn environment() -> CartEnvironment {
    CartEnvironment::new(Arc::new(test_clock()), Arc::new(Catalog::demo().unwrap()))
}

fn id(raw: &str) -> EventId {
    EventId::from(raw)
}

fn paid_form() -> PaymentForm {
    PaymentForm {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: "grace@example.com".to_string(),
        card_number: "5555 5555 5555 4444".to_string(),
        expiry_date: "01/30".to_string(),
        cvv: "321".to_string(),
        address: "Sveavägen 1".to_string(),
        city: "Stockholm".to_string(),
        zip_code: "111 57".to_string(),
    }
}

#[test]
fn add_add_remove_scenario() {
    let mut cart = Cart::new(environment());

    cart.add_to_cart("e1", 1).unwrap();
    assert_eq!(cart.cart_count(), 1);
    cart.add_to_cart("e1", 2).unwrap();
    assert_eq!(cart.cart_count(), 3);
    cart.remove_from_cart("e1").unwrap();
    assert_eq!(cart.cart_count(), 0);
}

#[test]
fn merging_keeps_first_added_date() {
    let start = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
    let env = CartEnvironment::new(
        Arc::new(SteppingClock::new(start, Duration::minutes(10))),
        Arc::new(Catalog::demo().unwrap()),
    );
    let mut cart = Cart::new(env);

    cart.add_to_cart("3", 2).unwrap();
    cart.add_to_cart("5", 1).unwrap();
    cart.add_to_cart("3", 3).unwrap();

    let items = cart.cart_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].event_id, id("3"));
    assert_eq!(items[0].quantity, 5);
    assert_eq!(items[0].added_date, start);
    assert_eq!(items[1].added_date, start + Duration::minutes(10));
}

#[test]
fn cart_items_is_a_snapshot() {
    let mut cart = Cart::new(environment());
    cart.add_to_cart("1", 1).unwrap();

    let snapshot = cart.cart_items();
    cart.add_to_cart("2", 1).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(cart.cart_items().len(), 2);
}

#[test]
fn remove_without_add_is_silent() {
    let mut cart = Cart::new(environment());
    cart.add_to_cart("1", 1).unwrap();
    let before = cart.cart_items();

    cart.remove_from_cart("never-added").unwrap();

    assert_eq!(cart.cart_items(), before);
}

#[test]
fn checkout_through_store_feeds_back_mark_as_paid() {
    let mut store = Store::new(CartState::new(), CartReducer::new(), environment());
    let mut updates = store.subscribe_actions();

    for (event_id, quantity) in [("1", 1), ("10", 2), ("5", 4)] {
        store
            .send(CartAction::AddToCart {
                event_id: id(event_id),
                quantity,
            })
            .unwrap();
    }

    let processed = store
        .send(CartAction::Checkout {
            selection: vec![id("10"), id("1")],
            form: paid_form(),
        })
        .unwrap();
    // Checkout plus the MarkAsPaid it dispatched
    assert_eq!(processed, 2);

    let state = store.state(Clone::clone);
    assert_eq!(state.cart_items().len(), 1);
    assert!(state.is_in_cart(&id("5")));
    // 250 + 2 * 75
    assert!((state.last_receipt.unwrap().total_amount - 400.0).abs() < 1e-9);

    let seen: Vec<CartAction> = std::iter::from_fn(|| updates.try_recv().ok()).collect();
    assert_eq!(seen.len(), 5);
    assert!(matches!(seen[3], CartAction::Checkout { .. }));
    assert_eq!(
        seen[4],
        CartAction::MarkAsPaid {
            event_ids: vec![id("10"), id("1")]
        }
    );
}

#[test]
fn free_events_check_out_at_zero() {
    let mut cart = Cart::new(environment());
    // Event 5 has no price, event 9 is explicitly free
    cart.add_to_cart("5", 2).unwrap();
    cart.add_to_cart("9", 1).unwrap();

    let receipt = cart.checkout(vec![id("5"), id("9")], paid_form()).unwrap();
    assert!(receipt.total_amount.abs() < f64::EPSILON);
    assert_eq!(cart.cart_count(), 0);
}

#[test]
fn checkout_errors_are_reported_in_order() {
    let mut cart = Cart::new(environment());
    cart.add_to_cart("1", 1).unwrap();

    assert_eq!(
        cart.checkout(vec![], PaymentForm::default()).unwrap_err(),
        CartCommandError::Rejected(CartError::NothingSelected)
    );
    assert_eq!(
        cart.checkout(vec![id("2")], PaymentForm::default()).unwrap_err(),
        CartCommandError::Rejected(CartError::NotInCart {
            event_ids: vec![id("2")]
        })
    );
    assert!(matches!(
        cart.checkout(vec![id("1")], PaymentForm::default()).unwrap_err(),
        CartCommandError::Rejected(CartError::MissingPaymentFields { .. })
    ));
    assert_eq!(cart.cart_count(), 1);
}

#[test]
fn entries_skip_lines_missing_from_catalog() {
    let mut cart = Cart::new(environment());
    cart.add_to_cart("2", 1).unwrap();
    cart.add_to_cart("ghost", 3).unwrap();

    let entries = cart.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event.title, "Stockholm Tech Summit");
    assert!((entries[0].line_total() - 1200.0).abs() < 1e-9);
    assert!((cart.total_amount(&[id("2"), id("ghost")]) - 1200.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn repeated_adds_merge_into_one_line(first in 1u32..100, second in 1u32..100) {
        let mut cart = Cart::new(environment());
        cart.add_to_cart("x", first).unwrap();
        cart.add_to_cart("x", second).unwrap();

        let items = cart.cart_items();
        prop_assert_eq!(items.len(), 1);
        prop_assert_eq!(items[0].quantity, first + second);
    }

    #[test]
    fn mark_as_paid_ignores_input_order(
        paid in prop::sample::subsequence(vec!["1", "2", "3", "4", "5", "6"], 0..=6),
        reversed in any::<bool>(),
    ) {
        let mut cart = Cart::new(environment());
        for raw in ["1", "2", "3", "4", "5", "6"] {
            cart.add_to_cart(raw, 1).unwrap();
        }

        let mut ids: Vec<EventId> = paid.iter().map(|raw| id(raw)).collect();
        if reversed {
            ids.reverse();
        }
        cart.mark_as_paid(ids).unwrap();

        let remaining: Vec<String> = cart
            .cart_items()
            .into_iter()
            .map(|line| line.event_id.to_string())
            .collect();
        let expected: Vec<String> = ["1", "2", "3", "4", "5", "6"]
            .into_iter()
            .filter(|raw| !paid.contains(raw))
            .map(str::to_string)
            .collect();
        prop_assert_eq!(remaining, expected);
    }
}
