// src/domain/catalog.rs
//
// Static description of the searchable tables and the vocabularies the
// model is allowed to answer with. The prompt builder renders all of it;
// the compiler only reads column names from here.

use crate::domain::filter::{Borough, MustHave, PropertyType};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingTable {
    Sales,
    Rentals,
    RentStabilized,
}

impl ListingTable {
    pub const ALL: [ListingTable; 3] = [
        ListingTable::Sales,
        ListingTable::Rentals,
        ListingTable::RentStabilized,
    ];

    pub fn schema(self) -> &'static TableSchema {
        match self {
            ListingTable::Sales => &SALES,
            ListingTable::Rentals => &RENTALS,
            ListingTable::RentStabilized => &RENT_STABILIZED,
        }
    }

    pub fn name(self) -> &'static str {
        self.schema().name
    }

    pub fn property_type(self) -> PropertyType {
        match self {
            ListingTable::Sales => PropertyType::Buy,
            ListingTable::Rentals | ListingTable::RentStabilized => PropertyType::Rent,
        }
    }

    /// Boolean column backing a must-have on this table, if it has one.
    pub fn amenity_column(self, token: MustHave) -> Option<&'static str> {
        self.schema()
            .amenity_columns
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, column)| *column)
    }
}

#[derive(Debug)]
pub struct ColumnDoc {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub meaning: &'static str,
}

#[derive(Debug)]
pub struct TableSchema {
    pub table: ListingTable,
    pub name: &'static str,
    pub description: &'static str,
    /// Column and value marking a listing as currently on the market.
    pub status_column: &'static str,
    pub active_status: &'static str,
    pub price_column: &'static str,
    /// "How far below market" column; also the sort key.
    pub discount_column: &'static str,
    pub amenity_columns: &'static [(MustHave, &'static str)],
    pub columns: &'static [ColumnDoc],
}

const fn col(name: &'static str, sql_type: &'static str, meaning: &'static str) -> ColumnDoc {
    ColumnDoc {
        name,
        sql_type,
        meaning,
    }
}

pub const NEIGHBORHOOD_COLUMN: &str = "neighborhood";
pub const BOROUGH_COLUMN: &str = "borough";
pub const BEDROOMS_COLUMN: &str = "bedrooms";

static SALES: TableSchema = TableSchema {
    table: ListingTable::Sales,
    name: "sales",
    description: "Homes and condos currently for sale, scored against comparable sales.",
    status_column: "status",
    active_status: "active",
    price_column: "price",
    discount_column: "discount_percent",
    amenity_columns: &[
        (MustHave::PetFriendly, "pet_friendly"),
        (MustHave::DoormanBuilding, "doorman_building"),
        (MustHave::ElevatorBuilding, "elevator_building"),
        (MustHave::LaundryAvailable, "laundry_available"),
    ],
    columns: &[
        col("address", "text", "street address with unit"),
        col("neighborhood", "text", "neighborhood name"),
        col("borough", "text", "one of the five boroughs"),
        col("bedrooms", "integer", "number of bedrooms, 0 = studio"),
        col("bathrooms", "real", "number of bathrooms"),
        col("sqft", "integer", "interior square feet"),
        col("price", "integer", "asking sale price in dollars"),
        col("monthly_hoa", "integer", "monthly HOA / common charges"),
        col("discount_percent", "real", "percent below estimated market value"),
        col("status", "text", "'active' while listed"),
        col("pet_friendly", "boolean", "pets allowed"),
        col("doorman_building", "boolean", "building has a doorman"),
        col("elevator_building", "boolean", "building has an elevator"),
        col("laundry_available", "boolean", "laundry in unit or building"),
    ],
};

static RENTALS: TableSchema = TableSchema {
    table: ListingTable::Rentals,
    name: "rentals",
    description: "Market-rate apartments for rent, scored against comparable rents.",
    status_column: "status",
    active_status: "active",
    price_column: "monthly_rent",
    discount_column: "discount_percent",
    amenity_columns: &[
        (MustHave::NoFee, "no_fee"),
        (MustHave::PetFriendly, "pet_friendly"),
        (MustHave::DoormanBuilding, "doorman_building"),
        (MustHave::ElevatorBuilding, "elevator_building"),
        (MustHave::LaundryAvailable, "laundry_available"),
        (MustHave::GymAvailable, "gym_available"),
        (MustHave::RooftopAccess, "rooftop_access"),
    ],
    columns: &[
        col("address", "text", "street address with unit"),
        col("neighborhood", "text", "neighborhood name"),
        col("borough", "text", "one of the five boroughs"),
        col("bedrooms", "integer", "number of bedrooms, 0 = studio"),
        col("bathrooms", "real", "number of bathrooms"),
        col("sqft", "integer", "interior square feet"),
        col("monthly_rent", "integer", "monthly rent in dollars"),
        col("discount_percent", "real", "percent below estimated market rent"),
        col("status", "text", "'active' while listed"),
        col("no_fee", "boolean", "no broker fee"),
        col("pet_friendly", "boolean", "pets allowed"),
        col("doorman_building", "boolean", "building has a doorman"),
        col("elevator_building", "boolean", "building has an elevator"),
        col("laundry_available", "boolean", "laundry in unit or building"),
        col("gym_available", "boolean", "building gym"),
        col("rooftop_access", "boolean", "rooftop or other outdoor space"),
    ],
};

static RENT_STABILIZED: TableSchema = TableSchema {
    table: ListingTable::RentStabilized,
    name: "rent_stabilized",
    description: "Rent-stabilized apartments for rent, scored against market rents.",
    status_column: "display_status",
    active_status: "active",
    price_column: "monthly_rent",
    discount_column: "undervaluation_percent",
    amenity_columns: &[
        (MustHave::NoFee, "no_fee"),
        (MustHave::PetFriendly, "pet_friendly"),
        (MustHave::DoormanBuilding, "doorman_building"),
        (MustHave::ElevatorBuilding, "elevator_building"),
        (MustHave::LaundryAvailable, "laundry_available"),
    ],
    columns: &[
        col("address", "text", "street address with unit"),
        col("neighborhood", "text", "neighborhood name"),
        col("borough", "text", "one of the five boroughs"),
        col("bedrooms", "integer", "number of bedrooms, 0 = studio"),
        col("bathrooms", "real", "number of bathrooms"),
        col("sqft", "integer", "interior square feet"),
        col("monthly_rent", "integer", "monthly rent in dollars"),
        col("legal_regulated_rent", "integer", "registered legal rent"),
        col("undervaluation_percent", "real", "percent below market rent"),
        col("display_status", "text", "'active' while listed"),
        col("no_fee", "boolean", "no broker fee"),
        col("pet_friendly", "boolean", "pets allowed"),
        col("doorman_building", "boolean", "building has a doorman"),
        col("elevator_building", "boolean", "building has an elevator"),
        col("laundry_available", "boolean", "laundry in unit or building"),
    ],
};

/// Neighborhood vocabulary, grouped by borough.
pub const NEIGHBORHOODS: &[(Borough, &[&str])] = &[
    (
        Borough::Manhattan,
        &[
            "Upper East Side",
            "Upper West Side",
            "Harlem",
            "East Harlem",
            "Washington Heights",
            "Inwood",
            "Hamilton Heights",
            "Morningside Heights",
            "Midtown",
            "Midtown East",
            "Hell's Kitchen",
            "Chelsea",
            "Flatiron",
            "Gramercy Park",
            "Murray Hill",
            "Kips Bay",
            "East Village",
            "West Village",
            "Greenwich Village",
            "SoHo",
            "NoHo",
            "Nolita",
            "Tribeca",
            "Lower East Side",
            "Chinatown",
            "Two Bridges",
            "Financial District",
            "Battery Park City",
            "Roosevelt Island",
        ],
    ),
    (
        Borough::Brooklyn,
        &[
            "Williamsburg",
            "Greenpoint",
            "Bushwick",
            "Bedford-Stuyvesant",
            "Crown Heights",
            "Prospect Heights",
            "Prospect Lefferts Gardens",
            "Park Slope",
            "Windsor Terrace",
            "Fort Greene",
            "Clinton Hill",
            "Brooklyn Heights",
            "DUMBO",
            "Downtown Brooklyn",
            "Cobble Hill",
            "Carroll Gardens",
            "Boerum Hill",
            "Red Hook",
            "Gowanus",
            "Sunset Park",
            "Bay Ridge",
            "Ditmas Park",
            "Flatbush",
            "Bensonhurst",
            "Sheepshead Bay",
            "Brighton Beach",
        ],
    ),
    (
        Borough::Queens,
        &[
            "Astoria",
            "Long Island City",
            "Sunnyside",
            "Woodside",
            "Jackson Heights",
            "Elmhurst",
            "Forest Hills",
            "Rego Park",
            "Kew Gardens",
            "Ridgewood",
            "Flushing",
            "Bayside",
            "Jamaica",
        ],
    ),
    (
        Borough::Bronx,
        &[
            "Mott Haven",
            "Concourse",
            "Fordham",
            "Kingsbridge",
            "Riverdale",
            "Morris Park",
            "Pelham Bay",
            "Throggs Neck",
        ],
    ),
    (
        Borough::StatenIsland,
        &[
            "St. George",
            "Tompkinsville",
            "Stapleton",
            "Great Kills",
            "Tottenville",
        ],
    ),
];

/// A vague phrase and the neighborhoods it stands for.
#[derive(Debug)]
pub struct Theme {
    pub phrases: &'static [&'static str],
    pub neighborhoods: &'static [&'static str],
}

pub const THEMES: &[Theme] = &[
    Theme {
        phrases: &["good schools", "family-friendly", "for families", "kid-friendly"],
        neighborhoods: &[
            "Park Slope",
            "Upper West Side",
            "Upper East Side",
            "Brooklyn Heights",
            "Carroll Gardens",
            "Forest Hills",
            "Bayside",
            "Riverdale",
        ],
    },
    Theme {
        phrases: &["trendy", "hip", "nightlife", "young professionals"],
        neighborhoods: &[
            "Williamsburg",
            "Bushwick",
            "Greenpoint",
            "East Village",
            "Lower East Side",
            "Astoria",
        ],
    },
    Theme {
        phrases: &["safe", "quiet", "low crime"],
        neighborhoods: &[
            "Upper East Side",
            "Brooklyn Heights",
            "Battery Park City",
            "Forest Hills",
            "Bay Ridge",
            "Riverdale",
        ],
    },
    Theme {
        phrases: &["near parks", "green", "near the park"],
        neighborhoods: &[
            "Park Slope",
            "Prospect Heights",
            "Windsor Terrace",
            "Upper West Side",
            "Forest Hills",
        ],
    },
    Theme {
        phrases: &["luxury", "upscale", "high-end"],
        neighborhoods: &["Tribeca", "SoHo", "West Village", "DUMBO", "Financial District"],
    },
    Theme {
        phrases: &["easy commute", "close to midtown", "short commute"],
        neighborhoods: &[
            "Long Island City",
            "Hell's Kitchen",
            "Murray Hill",
            "Astoria",
            "Sunnyside",
        ],
    },
    Theme {
        phrases: &["affordable", "cheap", "budget"],
        neighborhoods: &[
            "Washington Heights",
            "Inwood",
            "Bushwick",
            "Sunset Park",
            "Ridgewood",
            "Flatbush",
        ],
    },
];

/// Worked example shown to the model: a query and the exact JSON expected.
#[derive(Debug)]
pub struct FewShot {
    pub query: &'static str,
    pub filter_json: &'static str,
}

pub const FEW_SHOTS: &[FewShot] = &[
    FewShot {
        query: "2BR under $4k in Brooklyn",
        filter_json: r#"{"property_type": "rent", "max_budget": 4000, "bedrooms": 2, "neighborhoods": [], "boroughs": ["Brooklyn"], "must_haves": [], "interpretation": "2-bedroom rentals in Brooklyn under $4,000/month"}"#,
    },
    FewShot {
        query: "Pet-friendly with gym and doorman",
        filter_json: r#"{"neighborhoods": [], "boroughs": [], "must_haves": ["pet_friendly", "gym_available", "doorman_building"], "interpretation": "Pet-friendly listings with a gym and doorman"}"#,
    },
    FewShot {
        query: "no fee studio in the east village",
        filter_json: r#"{"property_type": "rent", "bedrooms": 0, "neighborhoods": ["East Village"], "boroughs": [], "must_haves": ["no_fee"], "interpretation": "No-fee studios in the East Village"}"#,
    },
    FewShot {
        query: "condo to buy in Park Slope or Williamsburg under 1.2M",
        filter_json: r#"{"property_type": "buy", "max_budget": 1200000, "neighborhoods": ["Park Slope", "Williamsburg"], "boroughs": [], "must_haves": [], "interpretation": "Homes for sale in Park Slope or Williamsburg under $1,200,000"}"#,
    },
    FewShot {
        query: "rent stabilized apartments in Manhattan at least 15% below market",
        filter_json: r#"{"property_type": "rent", "neighborhoods": [], "boroughs": ["Manhattan"], "must_haves": ["rent_stabilized"], "discount_threshold": 15, "interpretation": "Rent-stabilized rentals in Manhattan at least 15% below market"}"#,
    },
    FewShot {
        query: "3 bedroom near good schools",
        filter_json: r#"{"bedrooms": 3, "neighborhoods": ["Park Slope", "Upper West Side", "Upper East Side", "Brooklyn Heights", "Carroll Gardens", "Forest Hills", "Bayside", "Riverdale"], "boroughs": [], "must_haves": [], "interpretation": "3-bedroom listings in neighborhoods known for good schools"}"#,
    },
];
