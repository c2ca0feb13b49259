//! Client core for the product inventory dashboard: query construction,
//! filter/sort/page reconciliation, URL mirroring and the remote source.

use std::sync::Arc;

use shared::{
    domain::CategoryRecord,
    state::{DashboardState, FilterState, SortState},
};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod location;
pub mod query_builder;
pub mod reconciler;
pub mod source;
pub mod view;

pub use config::{load_settings, Settings};
pub use error::{LocationError, SourceError};
pub use location::DashboardLocation;
pub use reconciler::{FetchOutcome, FetchPlan, Pass, ResultsState, Settlement, StateReconciler};
pub use source::{ProductSource, RestProductSource};

#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub state: DashboardState,
    pub results: ResultsState,
    pub categories: Vec<CategoryRecord>,
    pub page_size: u32,
    pub location: String,
}

struct DashboardInner {
    reconciler: StateReconciler,
    location: DashboardLocation,
    mounted: bool,
}

/// Async driver: commits changes through the reconciler, mirrors the settled
/// state into the location and runs the resulting fetch against the source.
pub struct DashboardClient {
    source: Arc<dyn ProductSource>,
    inner: Mutex<DashboardInner>,
}

impl DashboardClient {
    /// Hydrates the initial state from `location`.
    pub fn new(
        source: Arc<dyn ProductSource>,
        location: DashboardLocation,
        page_size: u32,
    ) -> Arc<Self> {
        let reconciler = StateReconciler::new(location.hydrate(), page_size);
        Arc::new(Self {
            source,
            inner: Mutex::new(DashboardInner {
                reconciler,
                location,
                mounted: false,
            }),
        })
    }

    pub fn from_settings(settings: &Settings, location: DashboardLocation) -> Arc<Self> {
        Self::new(
            Arc::new(RestProductSource::new(settings)),
            location,
            settings.page_size,
        )
    }

    /// Loads categories once and fetches the hydrated page. Calling it again
    /// does nothing.
    pub async fn mount(&self) -> Settlement {
        let settlement = {
            let mut guard = self.inner.lock().await;
            if guard.mounted {
                return Settlement::default();
            }
            guard.mounted = true;
            guard.commit(StateReconciler::mount)
        };

        let (categories, settlement) =
            futures::join!(self.source.fetch_categories(), self.run(settlement));
        match categories {
            Ok(categories) => self.inner.lock().await.reconciler.set_categories(categories),
            Err(err) => warn!("category lookup failed; leaving list empty: {err}"),
        }
        settlement
    }

    pub async fn set_filters(&self, filters: FilterState) -> Settlement {
        let settlement = self.inner.lock().await.commit(|r| r.set_filters(filters));
        self.run(settlement).await
    }

    pub async fn set_sort(&self, sort: SortState) -> Settlement {
        let settlement = self.inner.lock().await.commit(|r| r.set_sort(sort));
        self.run(settlement).await
    }

    pub async fn set_page(&self, page: u32) -> Settlement {
        let settlement = self.inner.lock().await.commit(|r| r.set_page(page));
        self.run(settlement).await
    }

    pub async fn update_page(&self, update: impl FnOnce(u32) -> u32 + Send) -> Settlement {
        let settlement = self.inner.lock().await.commit(|r| r.update_page(update));
        self.run(settlement).await
    }

    pub async fn clear_filters(&self) -> Settlement {
        let settlement = self.inner.lock().await.commit(StateReconciler::clear_filters);
        self.run(settlement).await
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let guard = self.inner.lock().await;
        DashboardSnapshot {
            state: guard.reconciler.state().clone(),
            results: guard.reconciler.results().clone(),
            categories: guard.reconciler.categories().to_vec(),
            page_size: guard.reconciler.page_size(),
            location: guard.location.as_str().to_string(),
        }
    }

    /// Runs the settlement's fetch, if any. The lock is not held across the
    /// request, so overlapping fetches resolve independently and the
    /// reconciler keeps only the latest.
    async fn run(&self, settlement: Settlement) -> Settlement {
        let Some(plan) = settlement.fetch.as_ref() else {
            return settlement;
        };

        let result = self.source.fetch_products(&plan.query).await;
        if let Err(err) = &result {
            warn!(seq = plan.seq, "product query failed: {err}");
        }

        let outcome = self
            .inner
            .lock()
            .await
            .reconciler
            .apply_fetch_result(plan.seq, result);
        if outcome == FetchOutcome::Applied {
            info!(seq = plan.seq, page = plan.page, "dashboard results updated");
        }
        settlement
    }
}

impl DashboardInner {
    fn commit(&mut self, change: impl FnOnce(&mut StateReconciler) -> Settlement) -> Settlement {
        let settlement = change(&mut self.reconciler);
        if !settlement.passes.is_empty() {
            self.location.push(self.reconciler.state());
        }
        settlement
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
