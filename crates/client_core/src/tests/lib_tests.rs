use super::*;
use async_trait::async_trait;
use shared::{
    domain::{CategoryId, ProductId, ProductPage, ProductRecord},
    error::RemoteError,
    query::{Predicate, ProductQuery, RowRange},
    state::{SortColumn, SortOrder, StockStatus},
};
use std::{collections::VecDeque, sync::Mutex as StdMutex};
use tokio::sync::oneshot;

/// Scripted source: products replies are served in order, then it falls
/// back to an empty page.
#[derive(Default)]
struct FakeSource {
    queries: StdMutex<Vec<ProductQuery>>,
    replies: StdMutex<VecDeque<Result<ProductPage, String>>>,
    categories: StdMutex<Option<Result<Vec<CategoryRecord>, String>>>,
    category_calls: StdMutex<u32>,
}

impl FakeSource {
    fn with_replies(replies: Vec<Result<ProductPage, String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: StdMutex::new(replies.into()),
            ..Self::default()
        })
    }

    fn queries(&self) -> Vec<ProductQuery> {
        self.queries.lock().expect("queries").clone()
    }
}

#[async_trait]
impl ProductSource for FakeSource {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<ProductPage, SourceError> {
        self.queries.lock().expect("queries").push(query.clone());
        match self.replies.lock().expect("replies").pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(RemoteError::new(message).into()),
            None => Ok(ProductPage::default()),
        }
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>, SourceError> {
        *self.category_calls.lock().expect("calls") += 1;
        match self.categories.lock().expect("categories").clone() {
            Some(Ok(categories)) => Ok(categories),
            Some(Err(message)) => Err(SourceError::decode(message)),
            None => Ok(Vec::new()),
        }
    }
}

fn product(id: u32) -> ProductRecord {
    ProductRecord {
        id: ProductId(id.to_string()),
        name: format!("item {id}"),
        price: f64::from(id),
        stock_quantity: id,
        category_id: None,
        categories: None,
        created_at: None,
    }
}

fn page(ids: std::ops::Range<u32>, total: u64) -> ProductPage {
    ProductPage {
        rows: ids.map(product).collect(),
        total,
    }
}

fn client_at(source: Arc<FakeSource>, location: &str) -> Arc<DashboardClient> {
    DashboardClient::new(
        source,
        DashboardLocation::parse(location).expect("location"),
        reconciler::DEFAULT_PAGE_SIZE,
    )
}

#[tokio::test]
async fn mount_without_parameters_fetches_first_page_and_writes_location() {
    let source = FakeSource::with_replies(vec![Ok(page(0..10, 42))]);
    let client = client_at(source.clone(), "");

    let settlement = client.mount().await;

    assert_eq!(settlement.fetch_count(), 1);
    let queries = source.queries();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].predicates.is_empty());
    assert_eq!(queries[0].order.column, "created_at");
    assert_eq!(queries[0].order.direction, SortOrder::Asc);
    assert_eq!(queries[0].range, RowRange { from: 0, to: 9 });

    let snapshot = client.snapshot().await;
    assert_eq!(snapshot.results.products.len(), 10);
    assert_eq!(snapshot.results.total_products, 42);
    assert!(!snapshot.results.loading);
    assert_eq!(
        snapshot.location,
        "inventory://dashboard/?page=1&sortBy=created_at&order=asc"
    );
}

#[tokio::test]
async fn mount_runs_once() {
    let source = FakeSource::with_replies(vec![]);
    let client = client_at(source.clone(), "");

    client.mount().await;
    let again = client.mount().await;

    assert!(again.passes.is_empty());
    assert_eq!(source.queries().len(), 1);
    assert_eq!(*source.category_calls.lock().expect("calls"), 1);
}

#[tokio::test]
async fn mount_hydrates_filters_and_page_from_location() {
    let source = FakeSource::with_replies(vec![]);
    let client = client_at(
        source.clone(),
        "page=3&name=lamp&stockStatus=in_stock&sortBy=price&order=desc",
    );

    client.mount().await;

    let query = &source.queries()[0];
    assert_eq!(query.range, RowRange { from: 20, to: 29 });
    assert_eq!(query.order.column, "price");
    assert_eq!(query.order.direction, SortOrder::Desc);
    assert_eq!(query.predicate_for("name").count(), 1);
    assert_eq!(query.predicate_for("stock_quantity").count(), 1);
}

#[tokio::test]
async fn out_of_stock_on_page_three_resets_and_fetches_first_page_once() {
    let source = FakeSource::with_replies(vec![Ok(page(20..30, 42))]);
    let client = client_at(source.clone(), "page=3");
    client.mount().await;

    let settlement = client
        .set_filters(FilterState {
            stock_status: StockStatus::OutOfStock,
            ..FilterState::default()
        })
        .await;

    assert_eq!(settlement.fetch_count(), 1);
    let queries = source.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].range, RowRange { from: 0, to: 9 });
    assert_eq!(
        queries[1].predicates,
        vec![Predicate::Eq {
            column: "stock_quantity".to_string(),
            value: "0".to_string(),
        }]
    );

    let snapshot = client.snapshot().await;
    assert_eq!(snapshot.state.page, 1);
    assert_eq!(
        snapshot.location,
        "inventory://dashboard/?page=1&stockStatus=out_of_stock&sortBy=created_at&order=asc"
    );
}

#[tokio::test]
async fn zero_count_leaves_empty_grid() {
    let source = FakeSource::with_replies(vec![Ok(ProductPage::default())]);
    let client = client_at(source, "");

    client.mount().await;

    let snapshot = client.snapshot().await;
    assert!(snapshot.results.products.is_empty());
    let pagination = view::PaginationView::new(
        snapshot.state.page,
        snapshot.results.total_products,
        snapshot.page_size,
    );
    assert_eq!(pagination.label(), "Page 1 of 0 (0 total products)");
    assert_eq!(
        view::status_lines(&snapshot.results),
        vec![view::StatusLine::Empty]
    );
}

#[tokio::test]
async fn failed_fetch_shows_message_and_keeps_committed_state() {
    let source = FakeSource::with_replies(vec![
        Ok(page(0..10, 42)),
        Err("network error".to_string()),
    ]);
    let client = client_at(source, "");
    client.mount().await;

    let sort = SortState::new(SortColumn::Name, SortOrder::Asc);
    client.set_sort(sort).await;

    let snapshot = client.snapshot().await;
    assert!(snapshot.results.products.is_empty());
    assert_eq!(snapshot.results.error.as_deref(), Some("network error"));
    assert!(!snapshot.results.loading);
    assert_eq!(snapshot.state.sort, sort);
    assert_eq!(snapshot.state.page, 1);
}

#[tokio::test]
async fn clear_filters_returns_to_defaults_with_one_fetch() {
    let source = FakeSource::with_replies(vec![]);
    let client = client_at(
        source.clone(),
        "page=4&name=desk&category=9&minPrice=1&maxPrice=9&stockStatus=in_stock&sortBy=name&order=desc",
    );
    client.mount().await;

    let settlement = client.clear_filters().await;

    assert_eq!(settlement.fetch_count(), 1);
    let snapshot = client.snapshot().await;
    assert_eq!(snapshot.state, DashboardState::default());
    assert_eq!(source.queries().len(), 2);
    assert!(source.queries()[1].predicates.is_empty());
}

#[tokio::test]
async fn pagination_step_keeps_filters() {
    let source = FakeSource::with_replies(vec![]);
    let client = client_at(source.clone(), "category=7");
    client.mount().await;

    client.update_page(|page| page + 1).await;

    let queries = source.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].range, RowRange { from: 10, to: 19 });
    assert_eq!(
        queries[1].predicate_for("category_id").collect::<Vec<_>>(),
        vec![&Predicate::Eq {
            column: "category_id".to_string(),
            value: "7".to_string(),
        }]
    );
    assert_eq!(client.snapshot().await.state.page, 2);
}

#[tokio::test]
async fn category_lookup_failure_leaves_list_empty() {
    let source = FakeSource::with_replies(vec![Ok(page(0..3, 3))]);
    *source.categories.lock().expect("categories") = Some(Err("permission denied".to_string()));
    let client = client_at(source, "");

    client.mount().await;

    let snapshot = client.snapshot().await;
    assert!(snapshot.categories.is_empty());
    assert_eq!(snapshot.results.products.len(), 3);
    assert_eq!(snapshot.results.error, None);
}

#[tokio::test]
async fn categories_are_loaded_at_mount() {
    let source = FakeSource::with_replies(vec![]);
    *source.categories.lock().expect("categories") = Some(Ok(vec![CategoryRecord {
        id: CategoryId("1".to_string()),
        name: "Lighting".to_string(),
    }]));
    let client = client_at(source, "");

    client.mount().await;

    assert_eq!(client.snapshot().await.categories.len(), 1);
}

/// Holds the first products request until released so a second one can
/// overtake it.
struct GatedSource {
    gate: StdMutex<Option<oneshot::Receiver<()>>>,
    calls: StdMutex<u32>,
}

#[async_trait]
impl ProductSource for GatedSource {
    async fn fetch_products(&self, _query: &ProductQuery) -> Result<ProductPage, SourceError> {
        let call = {
            let mut calls = self.calls.lock().expect("calls");
            *calls += 1;
            *calls
        };
        let gate = self.gate.lock().expect("gate").take();
        if let Some(gate) = gate {
            let _ = gate.await;
            return Ok(page(0..10, 100));
        }
        Ok(page(0..call, u64::from(call)))
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>, SourceError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn slow_superseded_response_never_reaches_the_view() {
    let (release, gate) = oneshot::channel();
    let source = Arc::new(GatedSource {
        gate: StdMutex::new(None),
        calls: StdMutex::new(0),
    });
    let client = client_at_gated(source.clone());
    client.mount().await;
    *source.gate.lock().expect("gate") = Some(gate);

    let slow_client = client.clone();
    let slow = tokio::spawn(async move {
        slow_client
            .set_filters(FilterState {
                name: "slow".to_string(),
                ..FilterState::default()
            })
            .await
    });
    while *source.calls.lock().expect("calls") < 2 {
        tokio::task::yield_now().await;
    }

    client
        .set_filters(FilterState {
            name: "fast".to_string(),
            ..FilterState::default()
        })
        .await;
    let _ = release.send(());
    slow.await.expect("slow task");

    let snapshot = client.snapshot().await;
    assert_eq!(snapshot.state.filters.name, "fast");
    assert_eq!(snapshot.results.total_products, 3);
    assert_eq!(snapshot.results.products.len(), 3);
}

fn client_at_gated(source: Arc<GatedSource>) -> Arc<DashboardClient> {
    DashboardClient::new(
        source,
        DashboardLocation::default(),
        reconciler::DEFAULT_PAGE_SIZE,
    )
}
