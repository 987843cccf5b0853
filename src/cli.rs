//! Command-line interface definitions for News Sheet.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Work item paths follow the automation platform's environment variables so
//! the binary runs unchanged under its local file adapter.

use crate::api::SEARCH_URL;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the News Sheet task.
///
/// Business input (keyword, section, months) comes from the input work item,
/// not from flags.
///
/// # Examples
///
/// ```sh
/// # Input work items from the platform's environment
/// RPA_INPUT_WORKITEM_PATH=devdata/work-items-in/work-items.json news_sheet
///
/// # Explicit paths
/// news_sheet -i devdata/in.json -o output/work-items.json -d output
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input work items JSON file
    #[arg(short, long, env = "RPA_INPUT_WORKITEM_PATH")]
    pub input: PathBuf,

    /// Output work items JSON file
    #[arg(
        short,
        long,
        env = "RPA_OUTPUT_WORKITEM_PATH",
        default_value = "output/work-items.json"
    )]
    pub output: PathBuf,

    /// Existing directory receiving thumbnails and the result spreadsheet
    #[arg(short = 'd', long, default_value = "output")]
    pub output_dir: PathBuf,

    /// News search endpoint
    #[arg(long, env = "NEWS_SEARCH_URL", default_value = SEARCH_URL)]
    pub search_url: String,
}
