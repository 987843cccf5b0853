//! The batch task: search, extract, and write the result spreadsheet.
//!
//! 1. **Input**: Decode `keyword`, `section`, `months` from the work item payload
//! 2. **Fetching**: Request every search page for the query (sequential)
//! 3. **Extraction**: Process each page's articles concurrently, page after page
//! 4. **Output**: Write all records, in page order, to one spreadsheet

use crate::api::{SearchApi, fetch_pages};
use crate::error::TaskError;
use crate::models::{ArticleInfo, Payload, Query, TaskInput};
use crate::outputs::spreadsheet::write_result_file;
use crate::scrapers::articles::read_articles;
use crate::scrapers::thumbnails::ThumbnailFetcher;
use crate::utils::ensure_writable_dir;
use anyhow::Context;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Run the task for one work item payload.
///
/// # Returns
///
/// The number of articles written to the spreadsheet.
///
/// # Errors
///
/// - [`TaskError::Step`] when a search page cannot be fetched or is invalid
/// - [`TaskError::Unexpected`] for a malformed payload, an unusable output
///   directory, a crashed worker, or a failed spreadsheet write
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn run_task<S>(
    payload: &Payload,
    search: &S,
    thumbnails: Arc<dyn ThumbnailFetcher>,
    output_dir: &Path,
) -> Result<usize, TaskError>
where
    S: SearchApi + ?Sized,
{
    let input = TaskInput::from_payload(payload)?;
    info!(keyword = %input.keyword, section = ?input.section, months = input.months, "Task input");

    ensure_writable_dir(output_dir)
        .await
        .with_context(|| format!("output directory {}", output_dir.display()))?;

    let mut query = Query::new(
        &input.keyword,
        input.section.as_deref(),
        input.months,
        Local::now().naive_local(),
    )?;
    debug!(start = %query.start_date, end = %query.end_date, "Search window");

    let pages = fetch_pages(search, &mut query).await?;

    let mut infos: Vec<ArticleInfo> = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        info!(page = index, "Reading page");
        let page_infos = read_articles(&input.keyword, page, Arc::clone(&thumbnails), output_dir)
            .await
            .with_context(|| format!("extracting articles of page {index}"))?;
        infos.extend(page_infos);
        info!(page = index, "Finished page");
    }

    write_result_file(&infos, output_dir, Local::now().naive_local())
        .await
        .context("writing result spreadsheet")?;

    Ok(infos.len())
}
