//! News search API interaction and pagination.
//!
//! This module fetches every page of search results for a [`Query`].
//!
//! # Architecture
//!
//! The module uses a trait-based design so the paginator can run against any
//! transport:
//! - [`SearchApi`]: Core trait fetching one raw response for a query
//! - [`ReutersSearch`]: `reqwest`-backed implementation hitting the search endpoint
//! - [`check_page`]: Validates a raw response into a [`Page`]
//! - [`fetch_pages`]: Paginator issuing successive requests until the total is exhausted
//!
//! # Failure Mapping
//!
//! | Condition | Error |
//! |-----------|-------|
//! | `statusCode` outside `200..=226` | [`StepError::ResponseError`] |
//! | pagination block without `total_size` | [`StepError::EmptyPage`] |
//! | transport fault, invalid JSON, missing `result` | [`StepError::UnexpectedError`] |
//!
//! No request is retried.

use crate::error::StepError;
use crate::models::{Page, Query, SearchResponse};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Fixed search endpoint.
pub const SEARCH_URL: &str =
    "https://www.reuters.com/pf/api/v3/content/fetch/articles-by-search-v2";

/// Extra query parameters the endpoint expects next to the JSON query.
const EXTRA_PARAMS: [(&str, &str); 2] = [("d", "204"), ("_website", "reuters")];

/// Trait for fetching one page of search results.
///
/// Implementors return the decoded response body. Transport and decoding
/// faults are reported as [`StepError::UnexpectedError`]; validation of the
/// body is left to [`check_page`].
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &Query) -> Result<SearchResponse, StepError>;
}

/// Search API client over HTTP.
#[derive(Debug, Clone)]
pub struct ReutersSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl ReutersSearch {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl Default for ReutersSearch {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), SEARCH_URL)
    }
}

#[async_trait]
impl SearchApi for ReutersSearch {
    #[instrument(level = "info", skip_all, fields(offset = query.offset))]
    async fn search(&self, query: &Query) -> Result<SearchResponse, StepError> {
        let url = build_url(&self.endpoint, query)?;
        info!(%url, "Request page URL");

        let t0 = Instant::now();
        let body = self.client.get(&url).send().await?.text().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Received search response"
        );

        serde_json::from_str::<SearchResponse>(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "Search response is not the expected JSON"
            );
            StepError::from(e)
        })
    }
}

/// Build the request URL: `<endpoint>?query=<url-encoded JSON>&d=204&_website=reuters`.
pub fn build_url(endpoint: &str, query: &Query) -> Result<String, StepError> {
    let json = serde_json::to_string(query)?;
    let mut url = format!("{}?query={}", endpoint, urlencoding::encode(&json));
    for (key, value) in EXTRA_PARAMS {
        url.push('&');
        url.push_str(key);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    Ok(url)
}

/// Validate a raw response into a [`Page`].
///
/// # Errors
///
/// - [`StepError::ResponseError`] when `statusCode` is outside `200..=226`
/// - [`StepError::UnexpectedError`] when a successful response has no `result`
/// - [`StepError::EmptyPage`] when the pagination block has no `total_size`
pub fn check_page(response: SearchResponse) -> Result<Page, StepError> {
    if !(200..=226).contains(&response.status_code) {
        return Err(StepError::ResponseError(response.status_code));
    }
    let result = response.result.ok_or_else(|| {
        StepError::UnexpectedError("response has no result block".to_string())
    })?;
    let total_size = result.pagination.total_size.ok_or(StepError::EmptyPage)?;

    Ok(Page {
        total_size,
        articles: result.articles.unwrap_or_default(),
    })
}

/// Fetch every page of results for `query`.
///
/// The first response decides `total_size`; further pages are requested by
/// advancing the offset by the page size while `offset + size < total_size`.
/// Only `query.offset` is modified.
///
/// # Returns
///
/// The pages in request order. At least one page is returned on success.
#[instrument(level = "info", skip_all, fields(keyword = %query.keyword))]
pub async fn fetch_pages<S>(api: &S, query: &mut Query) -> Result<Vec<Page>, StepError>
where
    S: SearchApi + ?Sized,
{
    let t0 = Instant::now();
    query.offset = 0;

    let first = fetch_page(api, query).await?;
    let total_size = first.total_size;
    let mut pages = vec![first];

    while query.offset + query.size < total_size {
        query.offset += query.size;
        pages.push(fetch_page(api, query).await?);
    }

    info!(
        pages = pages.len(),
        articles = total_size,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched search pages"
    );
    Ok(pages)
}

async fn fetch_page<S>(api: &S, query: &Query) -> Result<Page, StepError>
where
    S: SearchApi + ?Sized,
{
    let res = api.search(query).await.and_then(check_page);
    if let Err(e) = &res {
        error!(offset = query.offset, code = e.code(), error = %e, "Search page failed");
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PAGE_SIZE;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Mutex;

    /// Serves `total` numbered articles in pages, recording requested offsets.
    struct FakeSearch {
        total: u64,
        offsets: Mutex<Vec<u64>>,
    }

    impl FakeSearch {
        fn new(total: u64) -> Self {
            Self {
                total,
                offsets: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchApi for FakeSearch {
        async fn search(&self, query: &Query) -> Result<SearchResponse, StepError> {
            self.offsets.lock().unwrap().push(query.offset);
            let end = (query.offset + query.size).min(self.total);
            let articles: Vec<_> = (query.offset..end)
                .map(|i| json!({"title": format!("article {i}"), "description": ""}))
                .collect();
            let body = json!({
                "statusCode": 200,
                "result": {"pagination": {"total_size": self.total}, "articles": articles}
            });
            Ok(serde_json::from_value(body)?)
        }
    }

    /// Always answers with the same body.
    struct FixedSearch(serde_json::Value);

    #[async_trait]
    impl SearchApi for FixedSearch {
        async fn search(&self, _query: &Query) -> Result<SearchResponse, StepError> {
            Ok(serde_json::from_value(self.0.clone())?)
        }
    }

    fn query() -> Query {
        let now = NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Query::new("gold", None, 2, now).unwrap()
    }

    #[test]
    fn test_build_url() {
        let url = build_url(SEARCH_URL, &query()).unwrap();

        assert!(url.starts_with(
            "https://www.reuters.com/pf/api/v3/content/fetch/articles-by-search-v2?query=%7B%22offset%22%3A0"
        ));
        assert!(url.ends_with("&d=204&_website=reuters"));
        assert!(url.contains("%22keyword%22%3A%22gold%22"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_check_page_ok() {
        let response: SearchResponse = serde_json::from_value(json!({
            "statusCode": 226,
            "result": {"pagination": {"total_size": 0}}
        }))
        .unwrap();
        let page = check_page(response).unwrap();

        assert_eq!(page.total_size, 0);
        assert!(page.articles.is_empty());
    }

    #[test]
    fn test_check_page_status_error() {
        let response: SearchResponse =
            serde_json::from_value(json!({"statusCode": 404})).unwrap();
        let err = check_page(response).unwrap_err();

        assert!(matches!(err, StepError::ResponseError(404)));
        assert_eq!(err.code(), "REQUEST_RESPONSE_ERROR");
    }

    #[test]
    fn test_check_page_status_bounds() {
        for status in [199, 227, 500] {
            let response: SearchResponse = serde_json::from_value(json!({
                "statusCode": status,
                "result": {"pagination": {"total_size": 1}}
            }))
            .unwrap();
            assert!(matches!(check_page(response), Err(StepError::ResponseError(s)) if s == status));
        }
    }

    #[test]
    fn test_check_page_empty() {
        let response: SearchResponse = serde_json::from_value(json!({
            "statusCode": 200,
            "result": {"pagination": {"size": 30}}
        }))
        .unwrap();
        assert!(matches!(check_page(response), Err(StepError::EmptyPage)));
    }

    #[test]
    fn test_check_page_missing_result() {
        let response: SearchResponse =
            serde_json::from_value(json!({"statusCode": 200})).unwrap();
        let err = check_page(response).unwrap_err();
        assert_eq!(err.code(), "REQUEST_UNEXPECTED_ERROR");
    }

    #[tokio::test]
    async fn test_fetch_pages_counts() {
        for total in [0u64, 1, 29, 30, 31, 65, 90] {
            let api = FakeSearch::new(total);
            let mut q = query();
            let pages = fetch_pages(&api, &mut q).await.unwrap();

            let expected_pages = total.div_ceil(PAGE_SIZE).max(1) as usize;
            assert_eq!(pages.len(), expected_pages, "total={total}");
            let articles: u64 = pages.iter().map(|p| p.articles.len() as u64).sum();
            assert_eq!(articles, total, "total={total}");
        }
    }

    #[tokio::test]
    async fn test_fetch_pages_offsets_in_order() {
        let api = FakeSearch::new(65);
        let mut q = query();
        let pages = fetch_pages(&api, &mut q).await.unwrap();

        assert_eq!(*api.offsets.lock().unwrap(), vec![0, 30, 60]);
        assert_eq!(pages[1].articles[0].title, "article 30");
        assert_eq!(pages[2].articles.last().unwrap().title, "article 64");
        assert_eq!(q.offset, 60);
    }

    #[tokio::test]
    async fn test_fetch_pages_stops_on_error() {
        let api = FixedSearch(json!({"statusCode": 404}));
        let mut q = query();
        let err = fetch_pages(&api, &mut q).await.unwrap_err();
        assert!(matches!(err, StepError::ResponseError(404)));
    }

    #[tokio::test]
    async fn test_fetch_pages_empty_page() {
        let api = FixedSearch(json!({"statusCode": 200, "result": {"pagination": {}}}));
        let mut q = query();
        let err = fetch_pages(&api, &mut q).await.unwrap_err();
        assert_eq!(err.code(), "REQUEST_EMPTY_PAGE");
    }

    #[tokio::test]
    async fn test_fetch_pages_thumbnail_without_url() {
        let api = FixedSearch(json!({
            "statusCode": 200,
            "result": {
                "pagination": {"total_size": 3},
                "articles": [
                    {"title": "a", "thumbnail": {"url": "https://img.example.com/a.jpg"}},
                    {"title": "b", "thumbnail": {"url": null}},
                    {"title": "c", "thumbnail": {}}
                ]
            }
        }));
        let mut q = query();
        let pages = fetch_pages(&api, &mut q).await.unwrap();

        assert_eq!(pages.len(), 1);
        let urls: Vec<&str> = pages[0]
            .articles
            .iter()
            .map(|a| a.thumbnail.as_ref().unwrap().url.as_str())
            .collect();
        assert_eq!(urls, vec!["https://img.example.com/a.jpg", "", ""]);
    }

    #[tokio::test]
    async fn test_reuters_search_unreachable_host() {
        let api = ReutersSearch::new(reqwest::Client::new(), "http://127.0.0.1:9/search");
        let err = api.search(&query()).await.unwrap_err();
        assert_eq!(err.code(), "REQUEST_UNEXPECTED_ERROR");
    }
}
