use crate::domain::catalog::ListingTable;
use crate::domain::filter::PropertyType;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Fields every listing table carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingCommon {
    pub id: i64,
    pub address: String,
    pub neighborhood: Option<String>,
    pub borough: Option<String>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<f64>,
    pub sqft: Option<i64>,
    pub listed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleListing {
    #[serde(flatten)]
    pub common: ListingCommon,
    pub price: i64,
    pub monthly_hoa: Option<i64>,
    pub discount_percent: Option<f64>,
    pub pet_friendly: bool,
    pub doorman_building: bool,
    pub elevator_building: bool,
    pub laundry_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalListing {
    #[serde(flatten)]
    pub common: ListingCommon,
    pub monthly_rent: i64,
    pub discount_percent: Option<f64>,
    pub no_fee: bool,
    pub pet_friendly: bool,
    pub doorman_building: bool,
    pub elevator_building: bool,
    pub laundry_available: bool,
    pub gym_available: bool,
    pub rooftop_access: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentStabilizedListing {
    #[serde(flatten)]
    pub common: ListingCommon,
    pub monthly_rent: i64,
    pub legal_regulated_rent: Option<i64>,
    pub undervaluation_percent: Option<f64>,
    pub no_fee: bool,
    pub pet_friendly: bool,
    pub doorman_building: bool,
    pub elevator_building: bool,
    pub laundry_available: bool,
}

/// A row from one of the three listing tables. Serialized with its source
/// table as the `table_source` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "table_source", rename_all = "snake_case")]
pub enum ListingRecord {
    Sales(SaleListing),
    Rentals(RentalListing),
    RentStabilized(RentStabilizedListing),
}

impl ListingRecord {
    pub fn table(&self) -> ListingTable {
        match self {
            ListingRecord::Sales(_) => ListingTable::Sales,
            ListingRecord::Rentals(_) => ListingTable::Rentals,
            ListingRecord::RentStabilized(_) => ListingTable::RentStabilized,
        }
    }

    pub fn common(&self) -> &ListingCommon {
        match self {
            ListingRecord::Sales(l) => &l.common,
            ListingRecord::Rentals(l) => &l.common,
            ListingRecord::RentStabilized(l) => &l.common,
        }
    }

    pub fn discount_percent(&self) -> Option<f64> {
        match self {
            ListingRecord::Sales(l) => l.discount_percent,
            ListingRecord::Rentals(l) => l.discount_percent,
            ListingRecord::RentStabilized(_) => None,
        }
    }

    pub fn undervaluation_percent(&self) -> Option<f64> {
        match self {
            ListingRecord::RentStabilized(l) => l.undervaluation_percent,
            _ => None,
        }
    }

    /// Discount if known, else undervaluation, else 0.
    pub fn rank_key(&self) -> f64 {
        self.discount_percent()
            .or_else(|| self.undervaluation_percent())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// A listing as returned to the caller: the row plus the category and
/// provenance tags added during fusion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedListing {
    #[serde(flatten)]
    pub listing: ListingRecord,
    pub property_type: PropertyType,
    #[serde(rename = "isRentStabilized")]
    pub is_rent_stabilized: bool,
}

impl RankedListing {
    pub fn annotate(listing: ListingRecord) -> Self {
        let table = listing.table();
        Self {
            property_type: table.property_type(),
            is_rent_stabilized: table == ListingTable::RentStabilized,
            listing,
        }
    }

    pub fn table_source(&self) -> ListingTable {
        self.listing.table()
    }

    pub fn rank_key(&self) -> f64 {
        self.listing.rank_key()
    }
}
