//! # News Sheet
//!
//! A batch task that searches a news API for a keyword within a recent time
//! window, extracts structured metadata and thumbnails from each article, and
//! writes the aggregated results to a spreadsheet.
//!
//! ## Features
//!
//! - Paginated search over the last N months, optionally restricted to a section
//! - One concurrent worker per article: keyword count, money detection,
//!   thumbnail download
//! - Deterministic result order: page order, then article order within a page
//! - Structured outcome reported through work items (completed, business
//!   failure, application failure)
//!
//! ## Usage
//!
//! ```sh
//! news_sheet -i devdata/work-items-in/work-items.json -d output
//! ```
//!
//! ## Architecture
//!
//! The task follows a pipeline architecture:
//! 1. **Input**: Read `keyword`, `section`, `months` from the input work item
//! 2. **Fetching**: Request every search page for the query
//! 3. **Extraction**: Process each page's articles concurrently
//! 4. **Output**: Write the result spreadsheet and report the outcome

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info, instrument};

mod api;
mod cli;
mod error;
mod logging;
mod models;
mod outcome;
mod outputs;
mod scrapers;
mod task;
mod utils;

use api::ReutersSearch;
use cli::Cli;
use outputs::workitems::{FileWorkItems, WorkItems};
use scrapers::thumbnails::{HttpThumbnails, ThumbnailFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Tracing init, scoped to this run ---
    let _log_guard = tracing::subscriber::set_default(logging::subscriber(logging::env_filter()));

    let args = Cli::parse();
    debug!(?args.input, ?args.output, ?args.output_dir, "Parsed CLI arguments");

    run(args).await
}

#[instrument(level = "info", skip_all)]
async fn run(args: Cli) -> anyhow::Result<()> {
    let start_time = std::time::Instant::now();
    info!("Task started");

    let mut items = FileWorkItems::open(&args.input, &args.output)
        .context("opening input work item")?;

    let client = reqwest::Client::new();
    let search = ReutersSearch::new(client.clone(), args.search_url.as_str());
    let thumbnails: Arc<dyn ThumbnailFetcher> = Arc::new(HttpThumbnails::new(client));

    let result = task::run_task(items.payload(), &search, thumbnails, &args.output_dir).await;
    let outcome = outcome::report(&mut items, result).context("reporting task outcome")?;

    let elapsed = start_time.elapsed();
    info!(
        status = outcome.status(),
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Task completed"
    );

    Ok(())
}
