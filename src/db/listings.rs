use crate::db::connection::Database;
use crate::domain::catalog::ListingTable;
use crate::domain::listing::{
    ListingCommon, ListingRecord, RentStabilizedListing, RentalListing, SaleListing,
};
use crate::errors::ServerError;
use crate::search::descriptor::{FilterValue, Predicate, QueryDescriptor};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Row};

/// Anything that can run a [`QueryDescriptor`] and hand back typed rows.
/// Shared across worker threads while a search fans out.
pub trait ListingStore: Send + Sync {
    fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<ListingRecord>, ServerError>;
}

const COMMON_COLUMNS: &str =
    "id, address, neighborhood, borough, bedrooms, bathrooms, sqft, listed_at";

const SALES_COLUMNS: &str = "price, monthly_hoa, discount_percent, pet_friendly, \
     doorman_building, elevator_building, laundry_available";

const RENTALS_COLUMNS: &str = "monthly_rent, discount_percent, no_fee, pet_friendly, \
     doorman_building, elevator_building, laundry_available, gym_available, rooftop_access";

const RENT_STABILIZED_COLUMNS: &str = "monthly_rent, legal_regulated_rent, \
     undervaluation_percent, no_fee, pet_friendly, doorman_building, elevator_building, \
     laundry_available";

impl ListingStore for Database {
    fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<ListingRecord>, ServerError> {
        let (sql, values) = render_select(query);

        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| ServerError::DbError(format!("Prepare failed: {e}")))?;

            let rows = stmt
                .query_map(params_from_iter(values.iter()), |row| map_row(query.table, row))
                .map_err(|e| ServerError::DbError(format!("Query failed: {e}")))?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
            }
            Ok(out)
        })
    }
}

/// SELECT statement and bind values for one descriptor.
pub fn render_select(query: &QueryDescriptor) -> (String, Vec<SqlValue>) {
    let table_columns = match query.table {
        ListingTable::Sales => SALES_COLUMNS,
        ListingTable::Rentals => RENTALS_COLUMNS,
        ListingTable::RentStabilized => RENT_STABILIZED_COLUMNS,
    };

    let mut values = Vec::new();
    let mut sql = format!(
        "SELECT {COMMON_COLUMNS}, {table_columns} FROM {}",
        query.table.name()
    );

    let clauses: Vec<String> = query
        .predicates
        .iter()
        .map(|p| render_predicate(p, &mut values))
        .collect();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let direction = if query.order_by.descending {
        "DESC"
    } else {
        "ASC"
    };
    sql.push_str(&format!(
        " ORDER BY {} {direction} NULLS LAST, id ASC LIMIT ?",
        query.order_by.column
    ));
    values.push(SqlValue::Integer(query.limit as i64));

    (sql, values)
}

fn render_predicate(predicate: &Predicate, values: &mut Vec<SqlValue>) -> String {
    match predicate {
        Predicate::Eq { column, value } => {
            values.push(match value {
                FilterValue::Text(s) => SqlValue::Text(s.clone()),
                FilterValue::Integer(n) => SqlValue::Integer(*n),
                FilterValue::Bool(b) => SqlValue::Integer(i64::from(*b)),
            });
            format!("{column} = ?")
        }
        Predicate::AtMost { column, value } => {
            values.push(SqlValue::Real(*value));
            format!("{column} <= ?")
        }
        Predicate::AtLeast { column, value } => {
            values.push(SqlValue::Real(*value));
            format!("{column} >= ?")
        }
        Predicate::ContainsIgnoreCase { column, needle } => {
            values.push(SqlValue::Text(format!(
                "%{}%",
                escape_like(&needle.to_lowercase())
            )));
            format!("LOWER({column}) LIKE ? ESCAPE '\\'")
        }
        Predicate::AnyOf(inner) if inner.is_empty() => "1 = 1".to_string(),
        Predicate::AnyOf(inner) => {
            let parts: Vec<String> = inner.iter().map(|p| render_predicate(p, values)).collect();
            format!("({})", parts.join(" OR "))
        }
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn map_common(row: &Row<'_>) -> rusqlite::Result<ListingCommon> {
    Ok(ListingCommon {
        id: row.get("id")?,
        address: row.get("address")?,
        neighborhood: row.get("neighborhood")?,
        borough: row.get("borough")?,
        bedrooms: row.get("bedrooms")?,
        bathrooms: row.get("bathrooms")?,
        sqft: row.get("sqft")?,
        listed_at: row.get("listed_at")?,
    })
}

fn map_row(table: ListingTable, row: &Row<'_>) -> rusqlite::Result<ListingRecord> {
    let common = map_common(row)?;
    Ok(match table {
        ListingTable::Sales => ListingRecord::Sales(SaleListing {
            common,
            price: row.get("price")?,
            monthly_hoa: row.get("monthly_hoa")?,
            discount_percent: row.get("discount_percent")?,
            pet_friendly: row.get("pet_friendly")?,
            doorman_building: row.get("doorman_building")?,
            elevator_building: row.get("elevator_building")?,
            laundry_available: row.get("laundry_available")?,
        }),
        ListingTable::Rentals => ListingRecord::Rentals(RentalListing {
            common,
            monthly_rent: row.get("monthly_rent")?,
            discount_percent: row.get("discount_percent")?,
            no_fee: row.get("no_fee")?,
            pet_friendly: row.get("pet_friendly")?,
            doorman_building: row.get("doorman_building")?,
            elevator_building: row.get("elevator_building")?,
            laundry_available: row.get("laundry_available")?,
            gym_available: row.get("gym_available")?,
            rooftop_access: row.get("rooftop_access")?,
        }),
        ListingTable::RentStabilized => ListingRecord::RentStabilized(RentStabilizedListing {
            common,
            monthly_rent: row.get("monthly_rent")?,
            legal_regulated_rent: row.get("legal_regulated_rent")?,
            undervaluation_percent: row.get("undervaluation_percent")?,
            no_fee: row.get("no_fee")?,
            pet_friendly: row.get("pet_friendly")?,
            doorman_building: row.get("doorman_building")?,
            elevator_building: row.get("elevator_building")?,
            laundry_available: row.get("laundry_available")?,
        }),
    })
}
