//! Two-way mapping between the dashboard state and the navigable URL.
//!
//! State is pushed into the URL after every settled change. The URL is read
//! back only once, when the dashboard mounts.

use std::borrow::Cow;

use shared::state::{CategoryFilter, DashboardState, FilterState, SortState, StockStatus};
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::error::LocationError;

pub const DEFAULT_DASHBOARD_URL: &str = "inventory://dashboard/";

pub const PAGE_PARAM: &str = "page";
pub const NAME_PARAM: &str = "name";
pub const CATEGORY_PARAM: &str = "category";
pub const MIN_PRICE_PARAM: &str = "minPrice";
pub const MAX_PRICE_PARAM: &str = "maxPrice";
pub const STOCK_STATUS_PARAM: &str = "stockStatus";
pub const SORT_BY_PARAM: &str = "sortBy";
pub const ORDER_PARAM: &str = "order";

pub fn to_query_string(state: &DashboardState) -> String {
    let filters = &state.filters;
    let mut query = form_urlencoded::Serializer::new(String::new());

    query.append_pair(PAGE_PARAM, &state.page.to_string());
    if !filters.name.is_empty() {
        query.append_pair(NAME_PARAM, &filters.name);
    }
    if !filters.category.is_all() {
        query.append_pair(CATEGORY_PARAM, filters.category.as_value());
    }
    if !filters.min_price.is_empty() {
        query.append_pair(MIN_PRICE_PARAM, &filters.min_price);
    }
    if !filters.max_price.is_empty() {
        query.append_pair(MAX_PRICE_PARAM, &filters.max_price);
    }
    if filters.stock_status != StockStatus::All {
        query.append_pair(STOCK_STATUS_PARAM, filters.stock_status.as_str());
    }
    query.append_pair(SORT_BY_PARAM, state.sort.column.as_str());
    query.append_pair(ORDER_PARAM, state.sort.order.as_str());

    query.finish()
}

/// Reads state from a query string (with or without the leading `?`).
/// Missing or unrecognized values fall back to their defaults.
pub fn parse_query(query: &str) -> DashboardState {
    let query = query.strip_prefix('?').unwrap_or(query);
    state_from_pairs(form_urlencoded::parse(query.as_bytes()))
}

fn state_from_pairs<'a>(
    pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
) -> DashboardState {
    let pairs: Vec<(Cow<'a, str>, Cow<'a, str>)> = pairs.collect();
    let get = |key: &str| first_value(&pairs, key);

    let page = get(PAGE_PARAM)
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|page| *page >= 1)
        .unwrap_or(1);

    let filters = FilterState {
        name: get(NAME_PARAM).to_string(),
        category: CategoryFilter::from_value(get(CATEGORY_PARAM)),
        min_price: get(MIN_PRICE_PARAM).to_string(),
        max_price: get(MAX_PRICE_PARAM).to_string(),
        stock_status: get(STOCK_STATUS_PARAM).parse().unwrap_or_default(),
    };

    let sort = SortState {
        column: get(SORT_BY_PARAM).parse().unwrap_or_default(),
        order: get(ORDER_PARAM).parse().unwrap_or_default(),
    };

    DashboardState {
        filters,
        sort,
        page,
    }
}

/// First occurrence wins for repeated keys.
fn first_value<'p>(pairs: &'p [(Cow<'_, str>, Cow<'_, str>)], key: &str) -> &'p str {
    pairs
        .iter()
        .find(|(k, _)| k.as_ref() == key)
        .map(|(_, v)| v.as_ref())
        .unwrap_or_default()
}

/// The dashboard's navigable address.
#[derive(Debug, Clone)]
pub struct DashboardLocation {
    url: Url,
}

impl Default for DashboardLocation {
    fn default() -> Self {
        Self {
            url: default_base(),
        }
    }
}

impl DashboardLocation {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Accepts a full URL, or a bare query string (`page=2&name=lamp`, with
    /// or without `?`) resolved against the default dashboard address.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::default());
        }

        match Url::parse(input) {
            Ok(url) => Ok(Self { url }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let mut url = default_base();
                url.set_query(Some(input.strip_prefix('?').unwrap_or(input)));
                Ok(Self { url })
            }
            Err(source) => Err(LocationError::InvalidUrl {
                input: input.to_string(),
                source,
            }),
        }
    }

    pub fn hydrate(&self) -> DashboardState {
        state_from_pairs(self.url.query_pairs())
    }

    /// Mirrors `state` into the URL. Returns whether the address changed.
    pub fn push(&mut self, state: &DashboardState) -> bool {
        let query = to_query_string(state);
        if self.url.query() == Some(query.as_str()) {
            return false;
        }
        self.url.set_query(Some(&query));
        debug!(location = %self.url, "dashboard location updated");
        true
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

fn default_base() -> Url {
    Url::parse(DEFAULT_DASHBOARD_URL).expect("default dashboard url is valid")
}

#[cfg(test)]
mod tests {
    use shared::{
        domain::CategoryId,
        state::{SortColumn, SortOrder},
    };

    use super::*;

    fn sample_states() -> Vec<DashboardState> {
        vec![
            DashboardState::default(),
            DashboardState {
                page: 12,
                filters: FilterState {
                    name: "red & blue lamp".to_string(),
                    category: CategoryFilter::Only(CategoryId("c9b1-44".to_string())),
                    min_price: "10.50".to_string(),
                    max_price: "200".to_string(),
                    stock_status: StockStatus::OutOfStock,
                },
                sort: SortState::new(SortColumn::StockQuantity, SortOrder::Desc),
            },
            DashboardState {
                page: 2,
                filters: FilterState {
                    max_price: "5".to_string(),
                    stock_status: StockStatus::InStock,
                    ..FilterState::default()
                },
                sort: SortState::new(SortColumn::Name, SortOrder::Asc),
            },
            DashboardState {
                page: 1,
                filters: FilterState {
                    name: "100% cotton = soft?".to_string(),
                    ..FilterState::default()
                },
                sort: SortState::new(SortColumn::Price, SortOrder::Desc),
            },
        ]
    }

    #[test]
    fn default_state_serializes_page_and_sort_only() {
        assert_eq!(
            to_query_string(&DashboardState::default()),
            "page=1&sortBy=created_at&order=asc"
        );
    }

    #[test]
    fn serializes_parameters_in_fixed_order() {
        let state = &sample_states()[1];
        assert_eq!(
            to_query_string(state),
            "page=12&name=red+%26+blue+lamp&category=c9b1-44&minPrice=10.50&maxPrice=200\
             &stockStatus=out_of_stock&sortBy=stock_quantity&order=desc"
        );
    }

    #[test]
    fn query_round_trip_reproduces_state() {
        for state in sample_states() {
            assert_eq!(parse_query(&to_query_string(&state)), state);
        }
    }

    #[test]
    fn location_round_trip_reproduces_state() {
        for state in sample_states() {
            let mut location = DashboardLocation::default();
            location.push(&state);
            let reopened = DashboardLocation::parse(location.as_str()).expect("parse");
            assert_eq!(reopened.hydrate(), state);
        }
    }

    #[test]
    fn missing_parameters_hydrate_defaults() {
        assert_eq!(parse_query(""), DashboardState::default());
        assert_eq!(
            DashboardLocation::default().hydrate(),
            DashboardState::default()
        );
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let state =
            parse_query("?page=abc&stockStatus=maybe&sortBy=weight&order=sideways&category=all");
        assert_eq!(state, DashboardState::default());

        assert_eq!(parse_query("page=0").page, 1);
        assert_eq!(parse_query("page=-3").page, 1);
        assert_eq!(parse_query("page=7").page, 7);
    }

    #[test]
    fn sort_fields_default_independently() {
        let state = parse_query("sortBy=price&order=bogus");
        assert_eq!(state.sort, SortState::new(SortColumn::Price, SortOrder::Asc));

        let state = parse_query("order=desc");
        assert_eq!(
            state.sort,
            SortState::new(SortColumn::CreatedAt, SortOrder::Desc)
        );
    }

    #[test]
    fn parses_bare_queries_and_full_urls() {
        let bare = DashboardLocation::parse("page=3&name=desk").expect("bare");
        assert_eq!(bare.hydrate().page, 3);
        assert!(bare.as_str().starts_with(DEFAULT_DASHBOARD_URL));

        let full = DashboardLocation::parse("https://shop.example/inventory?page=4&order=desc")
            .expect("full");
        assert_eq!(full.hydrate().page, 4);
        assert_eq!(full.hydrate().sort.order, SortOrder::Desc);
    }

    #[test]
    fn push_reports_whether_address_changed() {
        let mut location = DashboardLocation::default();
        let state = DashboardState::default();
        assert!(location.push(&state));
        assert!(!location.push(&state));
        assert_eq!(
            location.as_str(),
            "inventory://dashboard/?page=1&sortBy=created_at&order=asc"
        );
    }
}
