//! Filter/sort and cart benchmarks
//!
//! Measures the engine over the bundled catalog replicated to realistic list
//! sizes, and cart throughput through the store.
//!
//! Run with: `cargo bench -p eventpass`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eventpass::{
    filter_and_sort, Cart, CartEnvironment, Catalog, DateFilter, Event, EventId, FilterContext,
    FilterCriteria, GeoPoint, LocationContext, LocationFilter, PriceFilter, SortBy,
};
use eventpass_core::environment::SystemClock;
use std::sync::Arc;

fn replicated_events(copies: usize) -> Vec<Event> {
    let catalog = Catalog::demo().expect("bundled catalog should load");
    (0..copies)
        .flat_map(|copy| {
            catalog.events().iter().map(move |event| {
                let mut event = event.clone();
                event.id = EventId::new(format!("{copy}-{}", event.id));
                event
            })
        })
        .collect()
}

fn bench_filter_and_sort(c: &mut Criterion) {
    let location = LocationContext::resolved(GeoPoint::new(59.3293, 18.0686), "Stockholm");
    let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
    let ctx = FilterContext::new(today, &location);

    let busy = FilterCriteria {
        category: Some("Music".to_string()),
        search_query: "jazz".to_string(),
        date_filter: DateFilter::Custom {
            from: Some(today),
            to: chrono::NaiveDate::from_ymd_opt(2026, 12, 31),
        },
        price_filter: PriceFilter::custom("0", "500"),
        location_filter: LocationFilter::nearby(),
        sort_by: SortBy::Distance,
    };

    let mut group = c.benchmark_group("filter_and_sort");
    for copies in [1, 10, 100] {
        let events = replicated_events(copies);
        group.throughput(Throughput::Elements(events.len() as u64));

        group.bench_with_input(BenchmarkId::new("default", events.len()), &events, |b, events| {
            b.iter(|| filter_and_sort(black_box(events), &FilterCriteria::default(), &ctx));
        });
        group.bench_with_input(BenchmarkId::new("all_filters", events.len()), &events, |b, events| {
            b.iter(|| filter_and_sort(black_box(events), &busy, &ctx));
        });
        group.bench_with_input(BenchmarkId::new("distance_sort", events.len()), &events, |b, events| {
            let criteria = FilterCriteria {
                sort_by: SortBy::Distance,
                ..FilterCriteria::default()
            };
            b.iter(|| filter_and_sort(black_box(events), &criteria, &ctx));
        });
    }
    group.finish();
}

fn bench_cart(c: &mut Criterion) {
    let catalog = Arc::new(Catalog::demo().expect("bundled catalog should load"));
    let ids: Vec<EventId> = catalog.events().iter().map(|e| e.id.clone()).collect();

    c.bench_function("cart_add_each_event_twice", |b| {
        b.iter(|| {
            let mut cart = Cart::new(CartEnvironment::new(Arc::new(SystemClock), catalog.clone()));
            for id in ids.iter().chain(ids.iter()) {
                cart.add_to_cart(id.clone(), 1).expect("add should succeed");
            }
            black_box(cart.cart_count())
        });
    });
}

criterion_group!(benches, bench_filter_and_sort, bench_cart);
criterion_main!(benches);
