//! EventPass demo binary
//!
//! Runs a discovery session and a cart checkout against the fixture catalog.

use anyhow::Context;
use eventpass::{
    Cart, CartAction, CartEnvironment, Catalog, CatalogError, Config, DateFilter,
    DiscoveryAction, DiscoveryEnvironment, DiscoveryReducer, DiscoveryState, EventId, GeoPoint,
    LocationFilter, PaymentForm, PriceFilter, SortBy,
};
use eventpass_core::environment::{Clock, SystemClock};
use eventpass_runtime::Store;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(config.log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== EventPass Demo ===\n");

    let catalog = Arc::new(load_catalog(&config)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    run_discovery(&config, &catalog, clock.clone())?;
    run_checkout(&config, catalog, clock)?;

    println!("\n=== Demo Complete ===");
    Ok(())
}

fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    match Catalog::load(&config.catalog.fixtures_path) {
        Ok(catalog) => Ok(catalog),
        Err(CatalogError::Io { path, .. }) => {
            tracing::warn!(path = %path.display(), "Fixture file not found, using bundled catalog");
            Catalog::demo().context("Bundled catalog is invalid")
        },
        Err(err) => Err(err).context("Failed to load event catalog"),
    }
}

fn run_discovery(
    config: &Config,
    catalog: &Catalog,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<()> {
    let env = DiscoveryEnvironment::new(clock, config.discovery.fallback_city.clone());
    let today = env.today();
    let mut store = Store::with_broadcast_capacity(
        DiscoveryState::new(
            config.discovery.fallback_city.clone(),
            config.discovery.default_radius_km,
        ),
        DiscoveryReducer::new(),
        env,
        config.store.broadcast_capacity,
    );

    println!("Catalog: {} events in {:?}", catalog.len(), catalog.categories());

    let steps = [
        DiscoveryAction::LocationResolved {
            coords: GeoPoint::new(59.3293, 18.0686),
            city: "Stockholm".to_string(),
        },
        DiscoveryAction::ToggleCategory {
            category: "Music".to_string(),
        },
        DiscoveryAction::SetPriceFilter {
            filter: PriceFilter::Over100,
        },
        DiscoveryAction::SetLocationFilter {
            filter: LocationFilter::CurrentCity,
        },
        DiscoveryAction::SetSortBy {
            sort_by: SortBy::Popularity,
        },
        DiscoveryAction::ClearFilters,
        DiscoveryAction::SetDateFilter {
            filter: DateFilter::ThisWeek,
        },
        DiscoveryAction::SetSortBy {
            sort_by: SortBy::Distance,
        },
    ];

    for action in steps {
        println!("\n>>> {action:?}");
        store.send(action).context("Discovery update failed")?;

        store.state(|state| {
            let visible = state.visible_events(catalog, today);
            println!(
                "{} | {} | {} | sort: {} | {} active filter(s) -> {} event(s)",
                state.date_label(),
                state.price_label(),
                state.location_label(),
                state.sort_label(),
                state.active_filter_count(),
                visible.len()
            );
            for event in visible.iter().take(3) {
                println!("    {} {} - {}", event.date, event.start_time, event.title);
            }
        });
    }

    Ok(())
}

fn run_checkout(config: &Config, catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> anyhow::Result<()> {
    let mut cart = Cart::with_broadcast_capacity(
        CartEnvironment::new(clock, catalog),
        config.store.broadcast_capacity,
    );
    let mut updates = cart.subscribe();

    println!("\n--- Cart ---");
    cart.add_to_cart("1", 1)?;
    cart.add_to_cart("1", 1)?;
    cart.add_to_cart("4", 3)?;
    cart.add_to_cart("9", 1)?;
    println!("Cart holds {} ticket(s)", cart.cart_count());

    for entry in cart.entries() {
        println!(
            "    {} x{} = {:.2}",
            entry.event.title,
            entry.line.quantity,
            entry.line_total()
        );
    }

    let selection = vec![EventId::from("1"), EventId::from("4")];
    println!("Selected total: {:.2}", cart.total_amount(&selection));

    if let Err(err) = cart.checkout(selection.clone(), PaymentForm::default()) {
        println!("Checkout refused: {err}");
    }

    let form = PaymentForm {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        card_number: "4242 4242 4242 4242".to_string(),
        expiry_date: "12/29".to_string(),
        cvv: "123".to_string(),
        ..PaymentForm::default()
    };
    let receipt = cart.checkout(selection, form)?;
    println!(
        "Paid {:.2} for {} event(s) at {}",
        receipt.total_amount,
        receipt.event_ids.len(),
        receipt.paid_at
    );
    println!("Cart now holds {} ticket(s)", cart.cart_count());

    let mut notifications = 0;
    while let Ok(action) = updates.try_recv() {
        notifications += 1;
        if let CartAction::MarkAsPaid { event_ids } = action {
            tracing::info!(paid = event_ids.len(), "Observed paid lines");
        }
    }
    println!("Observer received {notifications} notification(s)");

    Ok(())
}
