//! Filter/sort engine behaviour over generated and fixture events.

#![allow(clippy::unwrap_used)]

mod common;

use common::{day, ids, EventBuilder, STOCKHOLM};
use eventpass::{
    filter_and_sort, Catalog, DateFilter, Event, FilterContext, FilterCriteria, LocationContext,
    LocationFilter, PriceFilter, SortBy, CATEGORIES,
};
use proptest::prelude::*;

fn stockholm() -> LocationContext {
    LocationContext::resolved(STOCKHOLM, "Stockholm")
}

fn arb_price() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        Just(Some(0.0)),
        Just(Some(50.0)),
        Just(Some(100.0)),
        (0.0..1000.0f64).prop_map(Some),
    ]
}

prop_compose! {
    fn arb_event()(
        id in "[a-z0-9]{1,6}",
        title in "[a-zA-Z ]{0,12}",
        description in "[a-zA-Z ]{0,20}",
        organizer in "[a-zA-Z ]{0,8}",
        category in prop::sample::select(CATEGORIES.to_vec()),
        price in arb_price(),
        day_offset in 0u64..30,
        hour in 0u32..24,
        attendees in 0u32..5000,
    ) -> Event {
        let date = day(2026, 10, 1)
            .checked_add_days(chrono::Days::new(day_offset))
            .unwrap();
        EventBuilder::new(&id)
            .title(&title)
            .description(&description)
            .organizer(&organizer)
            .category(category)
            .price(price)
            .on(date, &format!("{hour:02}:00"))
            .attendees(attendees)
            .build()
    }
}

fn price_bucket_hits(price: Option<f64>) -> usize {
    [
        PriceFilter::Free,
        PriceFilter::Under50,
        PriceFilter::From50To100,
        PriceFilter::Over100,
    ]
    .iter()
    .filter(|bucket| bucket.matches(price))
    .count()
}

proptest! {
    #[test]
    fn unrestricted_criteria_keep_everything_in_date_order(
        events in prop::collection::vec(arb_event(), 0..40)
    ) {
        let location = stockholm();
        let ctx = FilterContext::new(day(2026, 10, 1), &location);
        let result = filter_and_sort(&events, &FilterCriteria::default(), &ctx);

        prop_assert_eq!(result.len(), events.len());
        prop_assert!(result.windows(2).all(|pair| pair[0].starts_at() <= pair[1].starts_at()));
    }

    #[test]
    fn search_matches_iff_substring_of_searchable_fields(
        event in arb_event(),
        query in "[a-zA-Z]{0,3}",
    ) {
        let criteria = FilterCriteria {
            search_query: query.clone(),
            ..FilterCriteria::default()
        };
        let needle = query.to_lowercase();
        let expected = query.is_empty()
            || [&event.title, &event.description, &event.location.name, &event.organizer]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        prop_assert_eq!(criteria.matches_search(&event), expected);
    }

    #[test]
    fn price_buckets_partition_non_negative_prices(price in arb_price()) {
        prop_assert_eq!(price_bucket_hits(price), 1);
    }

    #[test]
    fn custom_price_range_is_inclusive(
        min in 0.0..500.0f64,
        width in 0.0..500.0f64,
        price in 0.0..1000.0f64,
    ) {
        let max = min + width;
        let range = PriceFilter::custom(min.to_string(), max.to_string());
        prop_assert_eq!(range.matches(Some(price)), min <= price && price <= max);
    }

    #[test]
    fn price_sort_is_idempotent(events in prop::collection::vec(arb_event(), 0..40)) {
        let location = stockholm();
        let ctx = FilterContext::new(day(2026, 10, 1), &location);
        let criteria = FilterCriteria {
            sort_by: SortBy::Price,
            ..FilterCriteria::default()
        };

        let once: Vec<Event> = filter_and_sort(&events, &criteria, &ctx)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_and_sort(&once, &criteria, &ctx);

        prop_assert_eq!(ids(&twice), once.iter().map(|e| e.id.to_string()).collect::<Vec<_>>());
        prop_assert!(twice.windows(2).all(|pair| pair[0].price_or_zero() <= pair[1].price_or_zero()));
    }

    #[test]
    fn popularity_sort_is_descending(events in prop::collection::vec(arb_event(), 0..40)) {
        let location = stockholm();
        let ctx = FilterContext::new(day(2026, 10, 1), &location);
        let criteria = FilterCriteria {
            sort_by: SortBy::Popularity,
            ..FilterCriteria::default()
        };
        let sorted = filter_and_sort(&events, &criteria, &ctx);
        prop_assert!(sorted.windows(2).all(|pair| pair[0].attendee_count >= pair[1].attendee_count));
    }

    #[test]
    fn filtering_never_adds_events(
        events in prop::collection::vec(arb_event(), 0..40),
        category in prop::sample::select(CATEGORIES.to_vec()),
        price in prop::sample::select(vec![
            PriceFilter::All,
            PriceFilter::Free,
            PriceFilter::Under50,
            PriceFilter::From50To100,
            PriceFilter::Over100,
        ]),
    ) {
        let location = stockholm();
        let ctx = FilterContext::new(day(2026, 10, 1), &location);
        let criteria = FilterCriteria {
            category: Some(category.to_string()),
            price_filter: price,
            ..FilterCriteria::default()
        };
        let result = filter_and_sort(&events, &criteria, &ctx);
        prop_assert!(result.len() <= events.len());
        prop_assert!(result.iter().all(|event| criteria.matches(event, &ctx)));
    }
}

#[test]
fn category_and_price_scenario() {
    let events = vec![
        EventBuilder::new("a").category("Music").price(Some(0.0)).build(),
        EventBuilder::new("b").category("Sports").price(Some(80.0)).build(),
    ];
    let location = stockholm();
    let ctx = FilterContext::new(day(2026, 10, 18), &location);

    let run = |criteria: FilterCriteria| ids(&filter_and_sort(&events, &criteria, &ctx));

    assert_eq!(
        run(FilterCriteria {
            category: Some("Music".to_string()),
            ..FilterCriteria::default()
        }),
        vec!["a"]
    );
    assert_eq!(
        run(FilterCriteria {
            price_filter: PriceFilter::Free,
            ..FilterCriteria::default()
        }),
        vec!["a"]
    );
    assert_eq!(
        run(FilterCriteria {
            price_filter: PriceFilter::From50To100,
            ..FilterCriteria::default()
        }),
        vec!["b"]
    );
}

#[test]
fn demo_catalog_today_and_this_week() {
    let catalog = Catalog::demo().unwrap();
    let location = stockholm();
    let ctx = FilterContext::new(day(2026, 10, 18), &location);

    let today = FilterCriteria {
        date_filter: DateFilter::Today,
        ..FilterCriteria::default()
    };
    // The meetup starts at 17:30, the jazz night at 20:00
    assert_eq!(ids(&filter_and_sort(catalog.events(), &today, &ctx)), vec!["17", "1"]);

    let this_week = FilterCriteria {
        date_filter: DateFilter::ThisWeek,
        ..FilterCriteria::default()
    };
    let week = filter_and_sort(catalog.events(), &this_week, &ctx);
    assert!(week.iter().all(|e| e.date >= day(2026, 10, 18) && e.date <= day(2026, 10, 25)));
    assert!(ids(&week).contains(&"3".to_string()));
    assert!(!ids(&week).contains(&"14".to_string()));
}

#[test]
fn demo_catalog_city_filters() {
    let catalog = Catalog::demo().unwrap();
    let location = stockholm();
    let ctx = FilterContext::new(day(2026, 10, 18), &location);

    let malmo = FilterCriteria {
        location_filter: LocationFilter::city("malmö"),
        ..FilterCriteria::default()
    };
    let result = filter_and_sort(catalog.events(), &malmo, &ctx);
    assert_eq!(ids(&result), vec!["23", "11", "12", "14", "13"]);

    let nearby = FilterCriteria {
        location_filter: LocationFilter::nearby(),
        sort_by: SortBy::Distance,
        ..FilterCriteria::default()
    };
    let result = filter_and_sort(catalog.events(), &nearby, &ctx);
    assert!(!result.is_empty());
    assert!(result.iter().all(|e| e.location.address.contains("Stockholm")));
}

#[test]
fn unknown_location_is_intentionally_fail_open_for_nearby() {
    let catalog = Catalog::demo().unwrap();
    let location = LocationContext::unavailable("Stockholm");
    let ctx = FilterContext::new(day(2026, 10, 18), &location);
    let nearby = FilterCriteria {
        location_filter: LocationFilter::nearby(),
        ..FilterCriteria::default()
    };
    assert_eq!(filter_and_sort(catalog.events(), &nearby, &ctx).len(), catalog.len());
}

#[test]
fn unparseable_custom_price_is_intentionally_fail_open() {
    let catalog = Catalog::demo().unwrap();
    let location = stockholm();
    let ctx = FilterContext::new(day(2026, 10, 18), &location);
    let custom = FilterCriteria {
        price_filter: PriceFilter::custom("cheap", "100"),
        ..FilterCriteria::default()
    };
    assert_eq!(filter_and_sort(catalog.events(), &custom, &ctx).len(), catalog.len());
}
