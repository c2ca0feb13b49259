//! Opaque query descriptor handed to the remote product source.

use serde::{Deserialize, Serialize};

use crate::state::SortOrder;

pub const PRODUCT_SELECT: &str = "*,categories(name)";
pub const CATEGORY_SELECT: &str = "id,name";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Case-insensitive substring match.
    Contains { column: String, needle: String },
    Eq { column: String, value: String },
    Gt { column: String, value: String },
    Gte { column: String, value: String },
    Lte { column: String, value: String },
}

impl Predicate {
    pub fn column(&self) -> &str {
        match self {
            Self::Contains { column, .. }
            | Self::Eq { column, .. }
            | Self::Gt { column, .. }
            | Self::Gte { column, .. }
            | Self::Lte { column, .. } => column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub column: String,
    pub direction: SortOrder,
}

/// Inclusive, zero-indexed row range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub from: u64,
    pub to: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    #[default]
    Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub select: String,
    pub predicates: Vec<Predicate>,
    pub order: Ordering,
    pub range: RowRange,
    pub count: CountMode,
}

impl ProductQuery {
    pub fn predicate_for<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a Predicate> + 'a {
        self.predicates
            .iter()
            .filter(move |predicate| predicate.column() == column)
    }
}
