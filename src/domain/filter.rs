// src/domain/filter.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Budgets below this are monthly rents, at or above it sale prices.
pub const RENT_BUDGET_CEILING: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Rent,
    Buy,
}

impl PropertyType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "rent" | "rental" | "rentals" | "lease" => Some(PropertyType::Rent),
            "buy" | "sale" | "sales" | "purchase" => Some(PropertyType::Buy),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Rent => "rent",
            PropertyType::Buy => "buy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    pub const ALL: [Borough; 5] = [
        Borough::Manhattan,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::Bronx,
        Borough::StatenIsland,
    ];

    /// The value stored in the `borough` column.
    pub fn name(self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::Bronx => "Bronx",
            Borough::StatenIsland => "Staten Island",
        }
    }

    /// Case-insensitive match against the five canonical names.
    /// "The Bronx" is accepted for the Bronx.
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        let name = lowered.strip_prefix("the ").unwrap_or(&lowered);
        Borough::ALL
            .into_iter()
            .find(|b| b.name().to_lowercase() == name)
    }
}

/// Canonical amenity / feature tokens a search can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MustHave {
    NoFee,
    PetFriendly,
    DoormanBuilding,
    ElevatorBuilding,
    LaundryAvailable,
    GymAvailable,
    RooftopAccess,
    RentStabilized,
}

/// Every spelling the model (or a user) might use, normalized with
/// [`normalize_token`], mapped to its canonical token.
const MUST_HAVE_SYNONYMS: &[(&str, MustHave)] = &[
    ("no_fee", MustHave::NoFee),
    ("nofee", MustHave::NoFee),
    ("no_broker_fee", MustHave::NoFee),
    ("no_brokers_fee", MustHave::NoFee),
    ("fee_free", MustHave::NoFee),
    ("pet_friendly", MustHave::PetFriendly),
    ("pets", MustHave::PetFriendly),
    ("pets_allowed", MustHave::PetFriendly),
    ("pets_ok", MustHave::PetFriendly),
    ("dog_friendly", MustHave::PetFriendly),
    ("cat_friendly", MustHave::PetFriendly),
    ("doorman", MustHave::DoormanBuilding),
    ("doorman_building", MustHave::DoormanBuilding),
    ("full_time_doorman", MustHave::DoormanBuilding),
    ("concierge", MustHave::DoormanBuilding),
    ("elevator", MustHave::ElevatorBuilding),
    ("elevator_building", MustHave::ElevatorBuilding),
    ("laundry", MustHave::LaundryAvailable),
    ("laundry_available", MustHave::LaundryAvailable),
    ("laundry_in_building", MustHave::LaundryAvailable),
    ("in_unit_laundry", MustHave::LaundryAvailable),
    ("washer_dryer", MustHave::LaundryAvailable),
    ("gym", MustHave::GymAvailable),
    ("gym_available", MustHave::GymAvailable),
    ("fitness_center", MustHave::GymAvailable),
    ("fitness_centre", MustHave::GymAvailable),
    ("rooftop", MustHave::RooftopAccess),
    ("rooftop_access", MustHave::RooftopAccess),
    ("roof_deck", MustHave::RooftopAccess),
    ("outdoor", MustHave::RooftopAccess),
    ("outdoor_space", MustHave::RooftopAccess),
    ("rent_stabilized", MustHave::RentStabilized),
    ("rent_stabilised", MustHave::RentStabilized),
    ("stabilized", MustHave::RentStabilized),
    ("rent_controlled", MustHave::RentStabilized),
    ("rent_regulated", MustHave::RentStabilized),
];

impl MustHave {
    pub const ALL: [MustHave; 8] = [
        MustHave::NoFee,
        MustHave::PetFriendly,
        MustHave::DoormanBuilding,
        MustHave::ElevatorBuilding,
        MustHave::LaundryAvailable,
        MustHave::GymAvailable,
        MustHave::RooftopAccess,
        MustHave::RentStabilized,
    ];

    pub fn from_token(raw: &str) -> Option<Self> {
        let key = normalize_token(raw);
        MUST_HAVE_SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == key)
            .map(|(_, token)| *token)
    }

    pub fn token(self) -> &'static str {
        match self {
            MustHave::NoFee => "no_fee",
            MustHave::PetFriendly => "pet_friendly",
            MustHave::DoormanBuilding => "doorman_building",
            MustHave::ElevatorBuilding => "elevator_building",
            MustHave::LaundryAvailable => "laundry_available",
            MustHave::GymAvailable => "gym_available",
            MustHave::RooftopAccess => "rooftop_access",
            MustHave::RentStabilized => "rent_stabilized",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MustHave::NoFee => "no fee",
            MustHave::PetFriendly => "pet-friendly",
            MustHave::DoormanBuilding => "doorman",
            MustHave::ElevatorBuilding => "elevator",
            MustHave::LaundryAvailable => "laundry",
            MustHave::GymAvailable => "gym",
            MustHave::RooftopAccess => "rooftop/outdoor space",
            MustHave::RentStabilized => "rent-stabilized",
        }
    }

    /// Synonyms listed for this token (canonical spelling excluded).
    pub fn synonyms(self) -> impl Iterator<Item = &'static str> {
        MUST_HAVE_SYNONYMS
            .iter()
            .filter(move |(synonym, token)| *token == self && *synonym != self.token())
            .map(|(synonym, _)| *synonym)
    }
}

/// "Pet-Friendly", "pet friendly" and "pet_friendly" all become "pet_friendly".
pub fn normalize_token(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if ch == '\'' {
            continue;
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// What the interpreter hands the compiler. Only `interpretation` is
/// required; a filter with everything else absent searches all listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    pub neighborhoods: Vec<String>,
    pub boroughs: Vec<Borough>,
    pub must_haves: Vec<MustHave>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_threshold: Option<f64>,
    pub interpretation: String,
}

impl StructuredFilter {
    pub fn has_must_have(&self, token: MustHave) -> bool {
        self.must_haves.contains(&token)
    }

    /// The listing category to search. A rent-stabilized requirement is
    /// always a rental search; otherwise an explicit type wins, and a bare
    /// budget decides by magnitude.
    pub fn effective_property_type(&self) -> Option<PropertyType> {
        if self.has_must_have(MustHave::RentStabilized) {
            return Some(PropertyType::Rent);
        }
        self.property_type.or_else(|| {
            self.max_budget.map(|budget| {
                if budget < RENT_BUDGET_CEILING {
                    PropertyType::Rent
                } else {
                    PropertyType::Buy
                }
            })
        })
    }

    /// Plain-English summary of the selection fields.
    pub fn describe(&self) -> String {
        let mut out = String::new();

        match self.bedrooms {
            Some(0) => out.push_str("Studio "),
            Some(n) => out.push_str(&format!("{n}-bedroom ")),
            None => {}
        }

        let noun = match self.effective_property_type() {
            Some(PropertyType::Rent) if self.has_must_have(MustHave::RentStabilized) => {
                "rent-stabilized rentals"
            }
            Some(PropertyType::Rent) => "rentals",
            Some(PropertyType::Buy) => "homes for sale",
            None => "listings",
        };
        out.push_str(noun);

        let places: Vec<&str> = self
            .neighborhoods
            .iter()
            .map(String::as_str)
            .chain(self.boroughs.iter().map(|b| b.name()))
            .collect();
        if !places.is_empty() {
            out.push_str(" in ");
            out.push_str(&join_with_or(&places));
        }

        if let Some(budget) = self.max_budget {
            out.push_str(" under ");
            out.push_str(&format_dollars(budget));
            if self.effective_property_type() == Some(PropertyType::Rent) {
                out.push_str("/month");
            }
        }

        let features: Vec<&str> = self
            .must_haves
            .iter()
            .filter(|m| **m != MustHave::RentStabilized)
            .map(|m| m.label())
            .collect();
        if !features.is_empty() {
            out.push_str(" with ");
            out.push_str(&features.join(", "));
        }

        if let Some(threshold) = self.discount_threshold {
            out.push_str(&format!(" at least {threshold}% below market"));
        }

        let mut chars = out.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => out,
        }
    }
}

fn join_with_or(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => (*one).to_string(),
        [head @ .., last] => format!("{} or {}", head.join(", "), last),
    }
}

/// `4000.0` -> `"$4,000"`; fractions of a dollar are dropped.
pub fn format_dollars(amount: f64) -> String {
    let whole = amount.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

/// The model's JSON, taken field by field so one odd value doesn't sink
/// the whole object.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawFilter {
    pub property_type: Value,
    pub max_budget: Value,
    pub bedrooms: Value,
    pub neighborhoods: Value,
    pub boroughs: Value,
    pub must_haves: Value,
    pub discount_threshold: Value,
    pub interpretation: Value,
}

impl From<RawFilter> for StructuredFilter {
    fn from(raw: RawFilter) -> Self {
        let property_type = raw.property_type.as_str().and_then(PropertyType::parse);

        let max_budget = lenient_number(&raw.max_budget).filter(|b| *b > 0.0);

        let bedrooms = match &raw.bedrooms {
            Value::String(s) if s.trim().eq_ignore_ascii_case("studio") => Some(0),
            other => lenient_number(other)
                .filter(|n| *n >= 0.0 && *n < 100.0)
                .map(|n| n.round() as u32),
        };

        let discount_threshold =
            lenient_number(&raw.discount_threshold).filter(|t| *t > 0.0 && *t <= 100.0);

        let mut neighborhoods: Vec<String> = Vec::new();
        for name in string_list(&raw.neighborhoods) {
            push_unique_ignore_case(&mut neighborhoods, name);
        }

        let mut boroughs: Vec<Borough> = Vec::new();
        for name in string_list(&raw.boroughs) {
            match Borough::parse(&name) {
                Some(b) if !boroughs.contains(&b) => boroughs.push(b),
                Some(_) => {}
                None => push_unique_ignore_case(&mut neighborhoods, name),
            }
        }

        let mut must_haves: Vec<MustHave> = Vec::new();
        for token in string_list(&raw.must_haves) {
            match MustHave::from_token(&token) {
                Some(m) if !must_haves.contains(&m) => must_haves.push(m),
                Some(_) => {}
                None => tracing::debug!(%token, "dropping unknown must-have token"),
            }
        }

        let mut filter = StructuredFilter {
            property_type,
            max_budget,
            bedrooms,
            neighborhoods,
            boroughs,
            must_haves,
            discount_threshold,
            interpretation: String::new(),
        };

        filter.interpretation = match raw.interpretation.as_str().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => filter.describe(),
        };
        filter
    }
}

/// Numbers or numeric strings such as "$4,000", "4k", "1.2M" or "15%".
pub fn lenient_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' ' | '_'))
        .collect();
    let lowered = cleaned.to_lowercase();
    let (digits, multiplier) = if let Some(d) = lowered.strip_suffix('k') {
        (d, 1_000.0)
    } else if let Some(d) = lowered.strip_suffix('m') {
        (d, 1_000_000.0)
    } else {
        (lowered.as_str(), 1.0)
    };
    digits.parse::<f64>().ok().map(|n| n * multiplier)
}

fn string_list(value: &Value) -> Vec<String> {
    let items: Vec<&str> = match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => vec![s.as_str()],
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn push_unique_ignore_case(list: &mut Vec<String>, item: String) {
    if !list.iter().any(|existing| existing.eq_ignore_ascii_case(&item)) {
        list.push(item);
    }
}
