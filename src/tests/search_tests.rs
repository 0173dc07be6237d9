// src/tests/search_tests.rs

use crate::domain::catalog::ListingTable;
use crate::domain::filter::{Borough, MustHave, PropertyType};
use crate::search::fusion::RESULT_CAP;
use crate::search::interpreter::FALLBACK_INTERPRETATION;
use crate::search::service::{
    SearchService, EMPTY_QUERY_MESSAGE, STORE_FAILURE_MESSAGE, UPSTREAM_FAILURE_MESSAGE,
};
use crate::tests::utils::{
    has_amenity, init_test_db, insert, price_of, FailingStore, Fixture, OneTableDown, StubModel,
};
use std::sync::Arc;

const TWO_BR_BROOKLYN_REPLY: &str = r#"```json
{
  "property_type": "rent",
  "max_budget": 4000,
  "bedrooms": 2,
  "neighborhoods": [],
  "boroughs": ["Brooklyn"],
  "must_haves": [],
  "interpretation": "2-bedroom rentals in Brooklyn under $4,000/month"
}
```"#;

#[test]
fn two_bedroom_brooklyn_under_4k_end_to_end() {
    let t = init_test_db();
    let good = insert(
        &t.db,
        ListingTable::Rentals,
        &Fixture {
            bedrooms: 2,
            price: 3800,
            discount: Some(12.0),
            ..Fixture::default()
        },
    );
    let stabilized = insert(
        &t.db,
        ListingTable::RentStabilized,
        &Fixture {
            neighborhood: "Crown Heights",
            bedrooms: 2,
            price: 2400,
            discount: Some(30.0),
            ..Fixture::default()
        },
    );
    // too expensive, wrong borough, wrong size, a sale
    insert(
        &t.db,
        ListingTable::Rentals,
        &Fixture {
            bedrooms: 2,
            price: 4500,
            ..Fixture::default()
        },
    );
    insert(
        &t.db,
        ListingTable::Rentals,
        &Fixture {
            borough: "Queens",
            neighborhood: "Astoria",
            bedrooms: 2,
            ..Fixture::default()
        },
    );
    insert(
        &t.db,
        ListingTable::Rentals,
        &Fixture {
            bedrooms: 1,
            ..Fixture::default()
        },
    );
    insert(
        &t.db,
        ListingTable::Sales,
        &Fixture {
            bedrooms: 2,
            price: 3500,
            ..Fixture::default()
        },
    );

    let model = Arc::new(StubModel::replying(TWO_BR_BROOKLYN_REPLY));
    let service = SearchService::new(Box::new(model.clone()), Box::new(t.db.clone()));

    let outcome = service.search("2BR under $4k in Brooklyn");

    assert_eq!(model.call_count(), 1);
    assert_eq!(
        outcome.interpretation,
        "2-bedroom rentals in Brooklyn under $4,000/month"
    );
    let filters = outcome.filters.expect("filters");
    assert_eq!(filters.boroughs, vec![Borough::Brooklyn]);

    let got: Vec<(i64, ListingTable)> = outcome
        .listings
        .iter()
        .map(|l| (l.listing.common().id, l.table_source()))
        .collect();
    assert_eq!(
        got,
        vec![
            (stabilized, ListingTable::RentStabilized),
            (good, ListingTable::Rentals)
        ]
    );
    for l in &outcome.listings {
        assert_eq!(l.property_type, PropertyType::Rent);
        assert_eq!(l.listing.common().bedrooms, Some(2));
        assert!(price_of(&l.listing) <= 4000);
    }
}

#[test]
fn amenity_query_only_returns_listings_with_every_amenity() {
    let t = init_test_db();
    let all_three = insert(
        &t.db,
        ListingTable::Rentals,
        &Fixture {
            amenities: &[
                MustHave::PetFriendly,
                MustHave::GymAvailable,
                MustHave::DoormanBuilding,
            ],
            ..Fixture::default()
        },
    );
    insert(
        &t.db,
        ListingTable::Rentals,
        &Fixture {
            amenities: &[MustHave::PetFriendly, MustHave::DoormanBuilding],
            ..Fixture::default()
        },
    );

    let model = StubModel::replying(
        r#"{"must_haves": ["pet friendly", "gym", "doorman"], "interpretation": "Pet-friendly with gym and doorman"}"#,
    );
    let service = SearchService::new(Box::new(model), Box::new(t.db.clone()));

    let outcome = service.search("Pet-friendly with gym and doorman");

    let rentals: Vec<i64> = outcome
        .listings
        .iter()
        .filter(|l| l.table_source() == ListingTable::Rentals)
        .map(|l| l.listing.common().id)
        .collect();
    assert_eq!(rentals, vec![all_three]);
    for l in &outcome.listings {
        assert!(has_amenity(&l.listing, MustHave::PetFriendly));
        assert!(has_amenity(&l.listing, MustHave::DoormanBuilding));
    }
}

#[test]
fn prose_reply_falls_back_to_active_rentals() {
    let t = init_test_db();
    for i in 0..15 {
        insert(
            &t.db,
            ListingTable::Rentals,
            &Fixture {
                discount: Some(f64::from(i)),
                ..Fixture::default()
            },
        );
        insert(
            &t.db,
            ListingTable::RentStabilized,
            &Fixture {
                discount: Some(f64::from(i) + 0.5),
                ..Fixture::default()
            },
        );
    }
    insert(
        &t.db,
        ListingTable::Sales,
        &Fixture {
            discount: Some(99.0),
            ..Fixture::default()
        },
    );
    insert(
        &t.db,
        ListingTable::Rentals,
        &Fixture {
            discount: Some(99.0),
            active: false,
            ..Fixture::default()
        },
    );

    let model = StubModel::replying("I'd love to help! What neighborhoods do you like?");
    let service = SearchService::new(Box::new(model), Box::new(t.db.clone()));

    let outcome = service.search("somewhere nice");

    assert_eq!(outcome.interpretation, FALLBACK_INTERPRETATION);
    assert_eq!(outcome.listings.len(), RESULT_CAP);
    assert!(outcome
        .listings
        .iter()
        .all(|l| l.property_type == PropertyType::Rent));
    assert!(outcome.listings.iter().all(|l| l.rank_key() < 99.0));
    assert!(outcome
        .listings
        .windows(2)
        .all(|pair| pair[0].rank_key() >= pair[1].rank_key()));

    let stabilized = outcome
        .listings
        .iter()
        .filter(|l| l.is_rent_stabilized)
        .count();
    assert_eq!(stabilized, 10);
}

#[test]
fn rent_stabilized_query_searches_only_that_table() {
    let t = init_test_db();
    insert(&t.db, ListingTable::Rentals, &Fixture::default());
    let id = insert(&t.db, ListingTable::RentStabilized, &Fixture::default());

    let model = StubModel::replying(
        r#"{"property_type": "rent", "must_haves": ["rent_stabilized"], "interpretation": "Rent-stabilized apartments"}"#,
    );
    let service = SearchService::new(Box::new(model), Box::new(t.db.clone()));

    let outcome = service.search("rent stabilized apartments");
    assert_eq!(outcome.listings.len(), 1);
    assert_eq!(outcome.listings[0].listing.common().id, id);
    assert!(outcome.listings[0].is_rent_stabilized);
}

#[test]
fn upstream_failure_returns_apology_and_nothing_else() {
    let t = init_test_db();
    insert(&t.db, ListingTable::Rentals, &Fixture::default());

    let service = SearchService::new(
        Box::new(StubModel::unreachable()),
        Box::new(t.db.clone()),
    );
    let outcome = service.search("2BR in Brooklyn");

    assert!(outcome.listings.is_empty());
    assert_eq!(outcome.interpretation, UPSTREAM_FAILURE_MESSAGE);
    assert!(outcome.filters.is_none());
}

#[test]
fn blank_query_never_reaches_the_model() {
    let model = Arc::new(StubModel::replying("{}"));
    let service = SearchService::new(Box::new(model.clone()), Box::new(FailingStore));

    for query in ["", "   ", "\n\t"] {
        let outcome = service.search(query);
        assert!(outcome.listings.is_empty());
        assert_eq!(outcome.interpretation, EMPTY_QUERY_MESSAGE);
    }
    assert_eq!(model.call_count(), 0);
}

#[test]
fn every_table_failing_reports_store_failure() {
    let service = SearchService::new(
        Box::new(StubModel::replying(r#"{"interpretation": "anything"}"#)),
        Box::new(FailingStore),
    );
    let outcome = service.search("anything at all");

    assert!(outcome.listings.is_empty());
    assert_eq!(outcome.interpretation, STORE_FAILURE_MESSAGE);
    assert!(!outcome.interpretation.is_empty());
}

#[test]
fn one_table_failing_keeps_the_others() {
    let t = init_test_db();
    insert(&t.db, ListingTable::Rentals, &Fixture::default());
    let stabilized = insert(&t.db, ListingTable::RentStabilized, &Fixture::default());

    let store = OneTableDown {
        db: t.db.clone(),
        down: ListingTable::Rentals,
    };
    let service = SearchService::new(
        Box::new(StubModel::replying(
            r#"{"property_type": "rent", "interpretation": "Rentals"}"#,
        )),
        Box::new(store),
    );
    let outcome = service.search("rentals");

    assert_eq!(outcome.interpretation, "Rentals");
    let ids: Vec<i64> = outcome
        .listings
        .iter()
        .map(|l| l.listing.common().id)
        .collect();
    assert_eq!(ids, vec![stabilized]);
}

#[test]
fn interpretation_is_never_empty() {
    let t = init_test_db();
    let service = SearchService::new(
        Box::new(StubModel::replying(r#"{"bedrooms": 3, "interpretation": ""}"#)),
        Box::new(t.db.clone()),
    );
    let outcome = service.search("three bedrooms");
    assert!(outcome.listings.is_empty());
    assert!(!outcome.interpretation.trim().is_empty());
}
