//! Filter/sort/page reconciliation.
//!
//! Every committed change runs one or more reconciliation passes. A pass
//! compares the current filters and sort with the snapshot taken by the
//! previous pass and decides between resetting the page and fetching:
//!
//! | filters/sort changed | page | outcome                                  |
//! |----------------------|------|------------------------------------------|
//! | yes                  | ≠ 1  | page := 1, no fetch, another pass runs   |
//! | yes                  | 1    | fetch page 1                             |
//! | no                   | any  | fetch current page                       |
//!
//! A settled change therefore issues exactly one fetch, and never against a
//! stale page number. Fetch plans carry a sequence number; responses for any
//! plan older than the latest one issued are discarded.

use std::fmt::Display;

use shared::{
    domain::{CategoryRecord, ProductPage, ProductRecord},
    query::ProductQuery,
    state::{DashboardState, FilterState, SortState},
};
use tracing::{debug, warn};

use crate::query_builder::build_product_query;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub seq: u64,
    pub page: u32,
    pub query: ProductQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    PageReset { from: u32 },
    Fetch { seq: u64, page: u32 },
}

/// Passes run by a single mutator call, and the fetch they settled on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settlement {
    pub passes: Vec<Pass>,
    pub fetch: Option<FetchPlan>,
}

impl Settlement {
    pub fn fetch_count(&self) -> usize {
        self.passes
            .iter()
            .filter(|pass| matches!(pass, Pass::Fetch { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Committed {
    filters: FilterState,
    sort: SortState,
}

impl Committed {
    fn of(state: &DashboardState) -> Self {
        Self {
            filters: state.filters.clone(),
            sort: state.sort,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsState {
    pub products: Vec<ProductRecord>,
    pub total_products: u64,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StateReconciler {
    state: DashboardState,
    page_size: u32,
    previous_committed: Committed,
    next_seq: u64,
    latest_issued: Option<u64>,
    results: ResultsState,
    categories: Vec<CategoryRecord>,
}

impl StateReconciler {
    pub fn new(initial: DashboardState, page_size: u32) -> Self {
        let mut initial = initial;
        initial.page = initial.page.max(1);
        Self {
            previous_committed: Committed::of(&initial),
            state: initial,
            page_size: page_size.max(1),
            next_seq: 1,
            latest_issued: None,
            results: ResultsState {
                loading: true,
                ..ResultsState::default()
            },
            categories: Vec::new(),
        }
    }

    /// First pass after hydration. Nothing has changed yet, so this fetches
    /// the hydrated page.
    pub fn mount(&mut self) -> Settlement {
        self.settle()
    }

    pub fn set_filters(&mut self, filters: FilterState) -> Settlement {
        self.state.filters = filters;
        self.settle()
    }

    pub fn set_sort(&mut self, sort: SortState) -> Settlement {
        self.state.sort = sort;
        self.settle()
    }

    /// Moves to `page` (0 is stored as 1). Re-selecting the current page
    /// changes nothing and runs no pass.
    pub fn set_page(&mut self, page: u32) -> Settlement {
        let page = page.max(1);
        if page == self.state.page {
            return Settlement::default();
        }
        self.state.page = page;
        self.settle()
    }

    pub fn update_page(&mut self, update: impl FnOnce(u32) -> u32) -> Settlement {
        let page = update(self.state.page);
        self.set_page(page)
    }

    /// Resets filters, sort and page together; they land in a single pass.
    pub fn clear_filters(&mut self) -> Settlement {
        self.state = DashboardState::default();
        self.settle()
    }

    fn settle(&mut self) -> Settlement {
        let mut settlement = Settlement::default();

        loop {
            let changed = self.previous_committed != Committed::of(&self.state);
            let reset_page = changed && self.state.page != 1;
            self.previous_committed = Committed::of(&self.state);

            if reset_page {
                let from = self.state.page;
                self.state.page = 1;
                debug!(from, "filters or sort changed; resetting to page 1");
                settlement.passes.push(Pass::PageReset { from });
                continue;
            }

            let plan = self.issue_fetch();
            debug!(seq = plan.seq, page = plan.page, changed, "issuing product fetch");
            settlement.passes.push(Pass::Fetch {
                seq: plan.seq,
                page: plan.page,
            });
            settlement.fetch = Some(plan);
            return settlement;
        }
    }

    fn issue_fetch(&mut self) -> FetchPlan {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_issued = Some(seq);
        self.results.loading = true;
        self.results.error = None;

        FetchPlan {
            seq,
            page: self.state.page,
            query: build_product_query(
                &self.state.filters,
                &self.state.sort,
                self.state.page,
                self.page_size,
            ),
        }
    }

    /// Lands the result of plan `seq`. Committed filters, sort and page are
    /// never rolled back, even on failure.
    pub fn apply_fetch_result<E: Display>(
        &mut self,
        seq: u64,
        result: Result<ProductPage, E>,
    ) -> FetchOutcome {
        if self.latest_issued != Some(seq) {
            warn!(
                seq,
                latest = ?self.latest_issued,
                "discarding response for superseded fetch"
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                self.results.products = page.rows;
                self.results.total_products = page.total;
                self.results.error = None;
            }
            Err(err) => {
                self.results.products.clear();
                self.results.error = Some(err.to_string());
            }
        }
        self.results.loading = false;
        FetchOutcome::Applied
    }

    pub fn set_categories(&mut self, categories: Vec<CategoryRecord>) {
        self.categories = categories;
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn filters(&self) -> &FilterState {
        &self.state.filters
    }

    pub fn sort(&self) -> SortState {
        self.state.sort
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }
}

#[cfg(test)]
#[path = "tests/reconciler_tests.rs"]
mod tests;
