// src/search/compiler.rs

use crate::domain::catalog::{ListingTable, BEDROOMS_COLUMN, BOROUGH_COLUMN, NEIGHBORHOOD_COLUMN};
use crate::domain::filter::{Borough, MustHave, PropertyType, StructuredFilter};
use crate::search::descriptor::{FilterValue, Predicate, QueryDescriptor, SortOrder};

pub const SALES_LIMIT: usize = 20;
/// Cap when a rental search hits only one of the two rental tables.
pub const SINGLE_RENTAL_SOURCE_LIMIT: usize = 20;
/// Cap per table when rentals and rent-stabilized are merged.
pub const COMBINED_RENTAL_SOURCE_LIMIT: usize = 10;

/// Turns a filter into one query per table to search. Pure: same filter,
/// same descriptors.
///
/// Rental descriptors come first, then sales. A rent-stabilized requirement
/// drops the market-rate rentals table entirely.
pub fn compile(filter: &StructuredFilter) -> Vec<QueryDescriptor> {
    let property_type = filter.effective_property_type();
    let wants_rentals = property_type != Some(PropertyType::Buy);
    let wants_sales = property_type != Some(PropertyType::Rent);

    let mut descriptors = Vec::with_capacity(3);

    if wants_rentals {
        if filter.has_must_have(MustHave::RentStabilized) {
            descriptors.push(describe(
                ListingTable::RentStabilized,
                filter,
                SINGLE_RENTAL_SOURCE_LIMIT,
            ));
        } else {
            descriptors.push(describe(
                ListingTable::Rentals,
                filter,
                COMBINED_RENTAL_SOURCE_LIMIT,
            ));
            descriptors.push(describe(
                ListingTable::RentStabilized,
                filter,
                COMBINED_RENTAL_SOURCE_LIMIT,
            ));
        }
    }

    if wants_sales {
        descriptors.push(describe(ListingTable::Sales, filter, SALES_LIMIT));
    }

    descriptors
}

fn describe(table: ListingTable, filter: &StructuredFilter, limit: usize) -> QueryDescriptor {
    let schema = table.schema();

    let mut predicates = vec![Predicate::eq_text(
        schema.status_column,
        schema.active_status,
    )];

    if let Some(budget) = filter.max_budget {
        predicates.push(Predicate::AtMost {
            column: schema.price_column,
            value: budget,
        });
    }

    if let Some(bedrooms) = filter.bedrooms {
        predicates.push(Predicate::Eq {
            column: BEDROOMS_COLUMN,
            value: FilterValue::Integer(i64::from(bedrooms)),
        });
    }

    if let Some(location) = location_predicate(filter) {
        predicates.push(location);
    }

    if let Some(threshold) = filter.discount_threshold {
        predicates.push(Predicate::AtLeast {
            column: schema.discount_column,
            value: threshold,
        });
    }

    // Tokens this table has no column for are skipped.
    for token in &filter.must_haves {
        if let Some(column) = table.amenity_column(*token) {
            predicates.push(Predicate::is_true(column));
        }
    }

    QueryDescriptor {
        table,
        predicates,
        order_by: SortOrder {
            column: schema.discount_column,
            descending: true,
        },
        limit,
    }
}

/// OR of every place the filter names. Borough names (in either list)
/// match the borough column exactly; anything else is a substring of the
/// neighborhood column.
fn location_predicate(filter: &StructuredFilter) -> Option<Predicate> {
    let mut conditions: Vec<Predicate> = Vec::new();

    let from_neighborhoods = filter.neighborhoods.iter().filter_map(|name| {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(match Borough::parse(name) {
            Some(borough) => Predicate::eq_text(BOROUGH_COLUMN, borough.name()),
            None => Predicate::ContainsIgnoreCase {
                column: NEIGHBORHOOD_COLUMN,
                needle: name.to_lowercase(),
            },
        })
    });
    let from_boroughs = filter
        .boroughs
        .iter()
        .map(|borough| Predicate::eq_text(BOROUGH_COLUMN, borough.name()));

    for condition in from_neighborhoods.chain(from_boroughs) {
        if !conditions.contains(&condition) {
            conditions.push(condition);
        }
    }

    (!conditions.is_empty()).then_some(Predicate::AnyOf(conditions))
}
