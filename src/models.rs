//! Data models for search queries, API pages, and extracted article records.
//!
//! This module defines the core data structures used throughout the task:
//! - [`Query`]: The search query sent to the news API, paginated by offset
//! - [`SearchResponse`]: A raw API response body as decoded from JSON
//! - [`Page`]: A validated response holding the total count and its articles
//! - [`Article`]: One article as returned by the API
//! - [`ArticleInfo`]: The record derived from an article and written to the spreadsheet
//! - [`TaskInput`]: The typed view of the input work item payload

use crate::utils::date_range;
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of articles requested per page.
pub const PAGE_SIZE: u64 = 30;

/// Site identifier expected by the search API.
pub const WEBSITE: &str = "reuters";

/// Sort order of the search results.
pub const ORDER_BY: &str = "display_date:desc";

/// Date format of the query's date range.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Work item payload: arbitrary key/value business data.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// The search query sent to the news API.
///
/// Built once per run; only `offset` changes while paginating. Field order
/// is the order of the serialized JSON.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Query {
    pub offset: u64,
    pub orderby: String,
    pub size: u64,
    pub website: String,
    pub start_date: String,
    pub end_date: String,
    pub keyword: String,
    /// Section path, e.g. `/world`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<String>,
}

impl Query {
    /// Build the first-page query for `keyword` over the last `months` months.
    ///
    /// The window ends at `now` and starts on the first day of the current
    /// month, shifted back `months - 1` further months. An empty section
    /// means no section filter.
    pub fn new(
        keyword: &str,
        section: Option<&str>,
        months: i64,
        now: NaiveDateTime,
    ) -> anyhow::Result<Self> {
        let (start, end) = date_range(now, months)
            .with_context(|| format!("computing date range for months={months}"))?;

        Ok(Self {
            offset: 0,
            orderby: ORDER_BY.to_string(),
            size: PAGE_SIZE,
            website: WEBSITE.to_string(),
            start_date: start.format(QUERY_DATE_FORMAT).to_string(),
            end_date: end.format(QUERY_DATE_FORMAT).to_string(),
            keyword: keyword.to_string(),
            sections: section
                .filter(|s| !s.is_empty())
                .map(|s| format!("/{s}")),
        })
    }
}

/// A raw search API response.
///
/// The API reports its own status inside the body rather than (only) in the
/// HTTP status line.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "statusCode")]
    pub status_code: i64,
    pub result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub pagination: Pagination,
    pub articles: Option<Vec<Article>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub total_size: Option<u64>,
}

/// One article as returned by the search API.
///
/// Absent or `null` text fields decode as empty strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_time: String,
    pub thumbnail: Option<Thumbnail>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Thumbnail reference of an article. An absent or `null` URL decodes as
/// empty and is treated like a missing thumbnail.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Thumbnail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// A validated search API page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Total number of articles matching the query, across all pages.
    pub total_size: u64,
    /// Articles of this page, in API order.
    pub articles: Vec<Article>,
}

/// The record derived from one article.
///
/// Field order is the column order of the result spreadsheet.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArticleInfo {
    pub title: String,
    pub date: String,
    pub description: String,
    /// Local file name of the downloaded thumbnail, or `"ERROR"` when the
    /// download failed.
    pub picture_file_name: String,
    /// Occurrences of the keyword in the title plus those in the description.
    pub count_keyword: usize,
    /// Whether the title or description mentions an amount of money.
    pub contain_money: bool,
}

impl ArticleInfo {
    /// Column headers, matching the field names.
    pub const HEADERS: [&'static str; 6] = [
        "title",
        "date",
        "description",
        "picture_file_name",
        "count_keyword",
        "contain_money",
    ];
}

/// Typed view of the input work item payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaskInput {
    pub keyword: String,
    #[serde(default)]
    pub section: Option<String>,
    pub months: i64,
}

impl TaskInput {
    pub fn from_payload(payload: &Payload) -> anyhow::Result<Self> {
        serde_json::from_value(serde_json::Value::Object(payload.clone()))
            .context("reading keyword, section and months from work item payload")
    }
}
