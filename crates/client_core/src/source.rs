//! Remote product and category sources.
//!
//! [`RestProductSource`] talks to a PostgREST endpoint (the REST surface of a
//! hosted Supabase project). Rows come back as JSON; the exact total comes
//! back in the `Content-Range` header because every product request asks for
//! `Prefer: count=exact`.

use async_trait::async_trait;
use reqwest::{header::CONTENT_RANGE, Client, RequestBuilder, Response};
use shared::{
    domain::{CategoryRecord, ProductPage, ProductRecord},
    error::RemoteError,
    query::{CountMode, Predicate, ProductQuery, CATEGORY_SELECT},
};
use tracing::{debug, info};

use crate::{config::Settings, error::SourceError};

const REST_PREFIX: &str = "rest/v1";

#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<ProductPage, SourceError>;
    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>, SourceError>;
}

pub struct RestProductSource {
    http: Client,
    api_url: String,
    api_key: Option<String>,
    products_table: String,
    categories_table: String,
}

impl RestProductSource {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            products_table: settings.products_table.clone(),
            categories_table: settings.categories_table.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PREFIX}/{table}", self.api_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key.as_str()).bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl ProductSource for RestProductSource {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<ProductPage, SourceError> {
        let params = query_params(query);
        debug!(table = %self.products_table, ?params, "querying products");

        let mut request = self
            .http
            .get(self.table_url(&self.products_table))
            .query(&params);
        if query.count == CountMode::Exact {
            request = request.header("Prefer", "count=exact");
        }

        let response = into_success(self.authorize(request).send().await?).await?;
        let total = match response.headers().get(CONTENT_RANGE) {
            Some(value) => {
                let value = value
                    .to_str()
                    .map_err(|_| SourceError::decode("Content-Range header is not text"))?;
                parse_content_range_total(value)?
            }
            None => return Err(SourceError::decode("response is missing Content-Range")),
        };
        let rows: Vec<ProductRecord> = response.json().await?;

        info!(rows = rows.len(), total, "products fetched");
        Ok(ProductPage { rows, total })
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>, SourceError> {
        let request = self
            .http
            .get(self.table_url(&self.categories_table))
            .query(&[("select", CATEGORY_SELECT)]);

        let categories: Vec<CategoryRecord> = into_success(self.authorize(request).send().await?)
            .await?
            .json()
            .await?;
        info!(count = categories.len(), "categories fetched");
        Ok(categories)
    }
}

/// Encodes the descriptor as PostgREST query parameters.
pub fn query_params(query: &ProductQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.select.clone())];

    for predicate in &query.predicates {
        let value = match predicate {
            Predicate::Contains { needle, .. } => format!("ilike.*{needle}*"),
            Predicate::Eq { value, .. } => format!("eq.{value}"),
            Predicate::Gt { value, .. } => format!("gt.{value}"),
            Predicate::Gte { value, .. } => format!("gte.{value}"),
            Predicate::Lte { value, .. } => format!("lte.{value}"),
        };
        params.push((predicate.column().to_string(), value));
    }

    params.push((
        "order".to_string(),
        format!("{}.{}", query.order.column, query.order.direction.as_str()),
    ));
    params.push(("offset".to_string(), query.range.from.to_string()));
    params.push((
        "limit".to_string(),
        (query.range.to - query.range.from + 1).to_string(),
    ));

    params
}

/// Reads the total from `0-9/42` or `*/0`.
pub fn parse_content_range_total(value: &str) -> Result<u64, SourceError> {
    let (_, total) = value
        .split_once('/')
        .ok_or_else(|| SourceError::decode(format!("malformed Content-Range: {value}")))?;
    total
        .trim()
        .parse()
        .map_err(|_| SourceError::decode(format!("Content-Range has no exact count: {value}")))
}

async fn into_success(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    let err = serde_json::from_str::<RemoteError>(&body).unwrap_or_else(|_| {
        let reason = status.canonical_reason().unwrap_or("request failed");
        RemoteError::new(format!("{} {reason}", status.as_u16()))
    });
    Err(err.into())
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
