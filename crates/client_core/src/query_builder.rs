//! Pure translation from control state to a remote product query.

use shared::{
    query::{CountMode, Ordering, Predicate, ProductQuery, RowRange, PRODUCT_SELECT},
    state::{CategoryFilter, FilterState, SortState, StockStatus},
};

pub const NAME_COLUMN: &str = "name";
pub const CATEGORY_COLUMN: &str = "category_id";
pub const PRICE_COLUMN: &str = "price";
pub const STOCK_COLUMN: &str = "stock_quantity";

/// Builds the query for `page` (1-indexed; 0 is read as 1).
pub fn build_product_query(
    filters: &FilterState,
    sort: &SortState,
    page: u32,
    page_size: u32,
) -> ProductQuery {
    ProductQuery {
        select: PRODUCT_SELECT.to_string(),
        predicates: filter_predicates(filters),
        order: Ordering {
            column: sort.column.as_str().to_string(),
            direction: sort.order,
        },
        range: page_range(page, page_size),
        count: CountMode::Exact,
    }
}

pub fn page_range(page: u32, page_size: u32) -> RowRange {
    let page_size = u64::from(page_size.max(1));
    let from = u64::from(page.max(1) - 1) * page_size;
    RowRange {
        from,
        to: from + page_size - 1,
    }
}

fn filter_predicates(filters: &FilterState) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if !filters.name.is_empty() {
        predicates.push(Predicate::Contains {
            column: NAME_COLUMN.to_string(),
            needle: filters.name.clone(),
        });
    }
    if let CategoryFilter::Only(id) = &filters.category {
        predicates.push(Predicate::Eq {
            column: CATEGORY_COLUMN.to_string(),
            value: id.to_string(),
        });
    }
    if !filters.min_price.is_empty() {
        predicates.push(Predicate::Gte {
            column: PRICE_COLUMN.to_string(),
            value: filters.min_price.clone(),
        });
    }
    if !filters.max_price.is_empty() {
        predicates.push(Predicate::Lte {
            column: PRICE_COLUMN.to_string(),
            value: filters.max_price.clone(),
        });
    }
    match filters.stock_status {
        StockStatus::All => {}
        StockStatus::InStock => predicates.push(Predicate::Gt {
            column: STOCK_COLUMN.to_string(),
            value: "0".to_string(),
        }),
        StockStatus::OutOfStock => predicates.push(Predicate::Eq {
            column: STOCK_COLUMN.to_string(),
            value: "0".to_string(),
        }),
    }

    predicates
}
