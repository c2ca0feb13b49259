//! Render-ready text for the presentation layers. Both front ends draw from
//! these so the wording stays identical.

use shared::domain::{CategoryRecord, ProductRecord};

use crate::reconciler::ResultsState;

pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Loading,
    Error(String),
    Empty,
}

impl StatusLine {
    pub fn text(&self) -> String {
        match self {
            Self::Loading => "Loading products...".to_string(),
            Self::Error(message) => format!("Error: {message}"),
            Self::Empty => "No products found.".to_string(),
        }
    }
}

/// Loading and error lines may show together; the empty line only appears
/// once a successful fetch returned nothing.
pub fn status_lines(results: &ResultsState) -> Vec<StatusLine> {
    let mut lines = Vec::new();
    if results.loading {
        lines.push(StatusLine::Loading);
    }
    if let Some(message) = &results.error {
        lines.push(StatusLine::Error(message.clone()));
    }
    if !results.loading && results.error.is_none() && results.products.is_empty() {
        lines.push(StatusLine::Empty);
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub title: String,
    pub category: String,
    pub price: String,
    pub stock: String,
    pub in_stock: bool,
}

impl ProductCard {
    pub fn from_record(product: &ProductRecord) -> Self {
        Self {
            title: product.name.clone(),
            category: format!("Category: {}", product.category_name().unwrap_or("N/A")),
            price: format!("${}", product.price),
            stock: if product.in_stock() {
                format!("{} in Stock", product.stock_quantity)
            } else {
                "Out of Stock".to_string()
            },
            in_stock: product.in_stock(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    pub total_pages: u64,
    pub total_products: u64,
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

impl PaginationView {
    pub fn new(page: u32, total_products: u64, page_size: u32) -> Self {
        let total_pages = total_products.div_ceil(u64::from(page_size.max(1)));
        Self {
            page,
            total_pages,
            total_products,
            previous_disabled: page == 1,
            next_disabled: u64::from(page) >= total_pages,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "Page {} of {} ({} total products)",
            self.page, self.total_pages, self.total_products
        )
    }

    /// Clamped at the first page.
    pub fn previous_page(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    /// Not clamped; the disabled state holds the upper bound.
    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }
}

pub fn category_options(categories: &[CategoryRecord]) -> Vec<(String, String)> {
    std::iter::once(("all".to_string(), ALL_CATEGORIES_LABEL.to_string()))
        .chain(
            categories
                .iter()
                .map(|category| (category.id.to_string(), category.name.clone())),
        )
        .collect()
}
