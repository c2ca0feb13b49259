//! Dashboard control state: the filter, sort and page triple that fully
//! determines the outstanding product query.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::CategoryId;

pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {field} value: {value:?}")]
pub struct ParseStateError {
    pub field: &'static str,
    pub value: String,
}

impl ParseStateError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    /// Reads the control value; empty text and the `all` sentinel both mean unset.
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() || value == ALL_SENTINEL {
            Self::All
        } else {
            Self::Only(CategoryId(value.to_string()))
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            Self::All => ALL_SENTINEL,
            Self::Only(id) => id.as_str(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    All,
    InStock,
    OutOfStock,
}

impl StockStatus {
    pub const ALL: [StockStatus; 3] = [Self::All, Self::InStock, Self::OutOfStock];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => ALL_SENTINEL,
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Stock",
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl FromStr for StockStatus {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "in_stock" => Ok(Self::InStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            other => Err(ParseStateError::new("stockStatus", other)),
        }
    }
}

/// User-chosen predicates narrowing the product list.
///
/// Price bounds hold the raw text typed into the control. Empty means unset;
/// anything else is forwarded to the remote service, which owns validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub name: String,
    pub category: CategoryFilter,
    pub min_price: String,
    pub max_price: String,
    pub stock_status: StockStatus,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    CreatedAt,
    Price,
    Name,
    StockQuantity,
}

impl SortColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Price => "price",
            Self::Name => "name",
            Self::StockQuantity => "stock_quantity",
        }
    }
}

impl FromStr for SortColumn {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            "stock_quantity" => Ok(Self::StockQuantity),
            other => Err(ParseStateError::new("sortBy", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ParseStateError::new("order", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl SortState {
    pub const fn new(column: SortColumn, order: SortOrder) -> Self {
        Self { column, order }
    }

    /// Combined control value, e.g. `stock_quantity_desc`.
    pub fn option_value(&self) -> String {
        format!("{}_{}", self.column.as_str(), self.order.as_str())
    }

    /// Splits a combined control value at its last underscore, so column
    /// names that contain underscores survive.
    pub fn from_option_value(value: &str) -> Result<Self, ParseStateError> {
        let (column, order) = value
            .rsplit_once('_')
            .ok_or_else(|| ParseStateError::new("sort", value))?;
        Ok(Self {
            column: column.parse()?,
            order: order.parse()?,
        })
    }
}

/// Options offered by the sort control. The default ordering
/// (`created_at_asc`) is intentionally absent.
pub const SORT_OPTIONS: [(SortState, &str); 6] = [
    (
        SortState::new(SortColumn::CreatedAt, SortOrder::Desc),
        "Sort by: Newest",
    ),
    (
        SortState::new(SortColumn::Price, SortOrder::Asc),
        "Price: Low to High",
    ),
    (
        SortState::new(SortColumn::Price, SortOrder::Desc),
        "Price: High to Low",
    ),
    (SortState::new(SortColumn::Name, SortOrder::Asc), "Name: A-Z"),
    (SortState::new(SortColumn::Name, SortOrder::Desc), "Name: Z-A"),
    (
        SortState::new(SortColumn::StockQuantity, SortOrder::Desc),
        "Stock: High to Low",
    ),
];

pub fn sort_label(sort: &SortState) -> &'static str {
    SORT_OPTIONS
        .iter()
        .find(|(option, _)| option == sort)
        .map(|(_, label)| *label)
        .unwrap_or("Sort by: Default")
}

/// The full control state. `page` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DashboardState {
    pub filters: FilterState,
    pub sort: SortState,
    pub page: u32,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            sort: SortState::default(),
            page: 1,
        }
    }
}
