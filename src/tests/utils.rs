use crate::db::connection::{init_db, Database};
use crate::db::listings::ListingStore;
use crate::domain::catalog::ListingTable;
use crate::domain::filter::MustHave;
use crate::domain::listing::{
    ListingCommon, ListingRecord, RentStabilizedListing, RentalListing, SaleListing,
};
use crate::errors::ServerError;
use crate::search::descriptor::QueryDescriptor;
use crate::search::{LanguageModel, LlmError};
use rusqlite::params_from_iter;
use rusqlite::types::Value as SqlValue;
use std::sync::Mutex;
use tempfile::TempDir;

/// A fresh database file with the production schema. Keep the struct alive
/// for as long as the database is used; dropping it deletes the file.
pub struct TestDb {
    _dir: TempDir,
    pub db: Database,
}

pub fn init_test_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
    let path = dir.path().join("listings.sqlite3");
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    TestDb { _dir: dir, db }
}

/// One listing row to insert. Column names are looked up in the catalog so
/// the same fixture works for every table.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub address: &'static str,
    pub neighborhood: &'static str,
    pub borough: &'static str,
    pub bedrooms: i64,
    pub price: i64,
    pub discount: Option<f64>,
    pub active: bool,
    pub amenities: &'static [MustHave],
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            address: "1 Test St #1A",
            neighborhood: "Williamsburg",
            borough: "Brooklyn",
            bedrooms: 1,
            price: 3000,
            discount: Some(10.0),
            active: true,
            amenities: &[],
        }
    }
}

pub fn insert(db: &Database, table: ListingTable, fixture: &Fixture) -> i64 {
    let schema = table.schema();
    let mut columns: Vec<&str> = vec![
        "address",
        "neighborhood",
        "borough",
        "bedrooms",
        "bathrooms",
        "sqft",
        "listed_at",
        schema.price_column,
        schema.discount_column,
        schema.status_column,
    ];
    let mut values: Vec<SqlValue> = vec![
        SqlValue::Text(fixture.address.to_string()),
        SqlValue::Text(fixture.neighborhood.to_string()),
        SqlValue::Text(fixture.borough.to_string()),
        SqlValue::Integer(fixture.bedrooms),
        SqlValue::Real(1.0),
        SqlValue::Integer(750),
        SqlValue::Text("2026-09-01 12:00:00".to_string()),
        SqlValue::Integer(fixture.price),
        fixture.discount.map(SqlValue::Real).unwrap_or(SqlValue::Null),
        SqlValue::Text(if fixture.active { "active" } else { "off_market" }.to_string()),
    ];
    for token in fixture.amenities {
        if let Some(column) = table.amenity_column(*token) {
            columns.push(column);
            values.push(SqlValue::Integer(1));
        }
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        schema.name,
        columns.join(", ")
    );

    db.with_conn(|conn| {
        conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(conn.last_insert_rowid())
    })
    .unwrap_or_else(|e| panic!("insert into {} failed: {e}", schema.name))
}

/// Language model double returning a canned reply and recording each call.
pub struct StubModel {
    reply: Result<String, String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl StubModel {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reply: Err("connection refused".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl LanguageModel for StubModel {
    fn complete(&self, system_prompt: &str, user_query: &str) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((system_prompt.to_string(), user_query.to_string()));
        }
        self.reply.clone().map_err(LlmError::Network)
    }
}

impl LanguageModel for std::sync::Arc<StubModel> {
    fn complete(&self, system_prompt: &str, user_query: &str) -> Result<String, LlmError> {
        self.as_ref().complete(system_prompt, user_query)
    }
}

/// Store where every table errors.
pub struct FailingStore;

impl ListingStore for FailingStore {
    fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<ListingRecord>, ServerError> {
        Err(ServerError::DbError(format!("{} is unavailable", query.table.name())))
    }
}

/// A real database where one table errors.
pub struct OneTableDown {
    pub db: Database,
    pub down: ListingTable,
}

impl ListingStore for OneTableDown {
    fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<ListingRecord>, ServerError> {
        if query.table == self.down {
            return Err(ServerError::DbError("no such table".into()));
        }
        self.db.fetch(query)
    }
}

/// Store that hands back fixed rows per table, ignoring predicates.
pub struct CannedStore {
    pub rows: Vec<ListingRecord>,
}

impl ListingStore for CannedStore {
    fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<ListingRecord>, ServerError> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.table() == query.table)
            .cloned()
            .collect())
    }
}

pub fn common(id: i64) -> ListingCommon {
    ListingCommon {
        id,
        address: format!("{id} Fixture Ave"),
        neighborhood: Some("Astoria".to_string()),
        borough: Some("Queens".to_string()),
        bedrooms: Some(1),
        bathrooms: Some(1.0),
        sqft: Some(700),
        listed_at: None,
    }
}

pub fn rental(id: i64, discount_percent: Option<f64>) -> ListingRecord {
    ListingRecord::Rentals(RentalListing {
        common: common(id),
        monthly_rent: 2800,
        discount_percent,
        no_fee: false,
        pet_friendly: false,
        doorman_building: false,
        elevator_building: false,
        laundry_available: false,
        gym_available: false,
        rooftop_access: false,
    })
}

pub fn sale(id: i64, discount_percent: Option<f64>) -> ListingRecord {
    ListingRecord::Sales(SaleListing {
        common: common(id),
        price: 650_000,
        monthly_hoa: Some(600),
        discount_percent,
        pet_friendly: false,
        doorman_building: false,
        elevator_building: false,
        laundry_available: false,
    })
}

pub fn stabilized(id: i64, undervaluation_percent: Option<f64>) -> ListingRecord {
    ListingRecord::RentStabilized(RentStabilizedListing {
        common: common(id),
        monthly_rent: 1900,
        legal_regulated_rent: Some(2100),
        undervaluation_percent,
        no_fee: true,
        pet_friendly: false,
        doorman_building: false,
        elevator_building: false,
        laundry_available: false,
    })
}

/// Sale price or monthly rent.
pub fn price_of(record: &ListingRecord) -> i64 {
    match record {
        ListingRecord::Sales(l) => l.price,
        ListingRecord::Rentals(l) => l.monthly_rent,
        ListingRecord::RentStabilized(l) => l.monthly_rent,
    }
}

/// Whether the row carries the column behind a must-have token. A
/// rent-stabilized row always satisfies `rent_stabilized`.
pub fn has_amenity(record: &ListingRecord, token: MustHave) -> bool {
    match (record, token) {
        (ListingRecord::RentStabilized(_), MustHave::RentStabilized) => true,
        (ListingRecord::Sales(l), _) => match token {
            MustHave::PetFriendly => l.pet_friendly,
            MustHave::DoormanBuilding => l.doorman_building,
            MustHave::ElevatorBuilding => l.elevator_building,
            MustHave::LaundryAvailable => l.laundry_available,
            _ => false,
        },
        (ListingRecord::Rentals(l), _) => match token {
            MustHave::NoFee => l.no_fee,
            MustHave::PetFriendly => l.pet_friendly,
            MustHave::DoormanBuilding => l.doorman_building,
            MustHave::ElevatorBuilding => l.elevator_building,
            MustHave::LaundryAvailable => l.laundry_available,
            MustHave::GymAvailable => l.gym_available,
            MustHave::RooftopAccess => l.rooftop_access,
            MustHave::RentStabilized => false,
        },
        (ListingRecord::RentStabilized(l), _) => match token {
            MustHave::NoFee => l.no_fee,
            MustHave::PetFriendly => l.pet_friendly,
            MustHave::DoormanBuilding => l.doorman_building,
            MustHave::ElevatorBuilding => l.elevator_building,
            MustHave::LaundryAvailable => l.laundry_available,
            _ => false,
        },
    }
}
