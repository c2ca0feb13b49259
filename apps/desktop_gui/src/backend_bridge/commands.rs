//! Backend commands queued from UI to backend worker.

use client_core::FetchPlan;

#[derive(Debug)]
pub enum BackendCommand {
    /// Run one product query. The answer carries the plan's sequence number.
    FetchProducts(FetchPlan),
    FetchCategories,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchProducts(_) => "fetch_products",
            Self::FetchCategories => "fetch_categories",
        }
    }
}
