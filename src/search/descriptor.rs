use crate::domain::catalog::ListingTable;

/// Right-hand side of an equality predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

/// One condition of a listing query. Column names always come from the
/// static catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq {
        column: &'static str,
        value: FilterValue,
    },
    AtMost {
        column: &'static str,
        value: f64,
    },
    AtLeast {
        column: &'static str,
        value: f64,
    },
    /// Case-insensitive substring match; `needle` is stored lowercased.
    ContainsIgnoreCase {
        column: &'static str,
        needle: String,
    },
    /// True when any inner predicate holds.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn eq_text(column: &'static str, value: impl Into<String>) -> Self {
        Predicate::Eq {
            column,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn is_true(column: &'static str) -> Self {
        Predicate::Eq {
            column,
            value: FilterValue::Bool(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub descending: bool,
}

/// Everything needed to run one table's slice of a search.
/// Predicates are AND-ed together.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub table: ListingTable,
    pub predicates: Vec<Predicate>,
    pub order_by: SortOrder,
    pub limit: usize,
}
