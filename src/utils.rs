//! Utility functions for date windows, article text analysis, and file system checks.
//!
//! This module provides helper functions used throughout the task:
//! - Date window computation for the search query
//! - Keyword counting and money detection over article text
//! - Thumbnail file naming
//! - Output directory validation and result file naming

use chrono::{Datelike, Months, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Matches `$` followed by digits, commas or periods, or a number followed by
/// `dollars` or `USD`.
static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\$[\d,.]+)|([\d,.]+ (dollars|USD))").expect("money pattern is valid")
});

/// Compute the `(start, end)` search window for the last `months` months.
///
/// `end` is `now`. `start` is `now` moved to the first day of its month, then
/// shifted back `months - 1` further months when `months > 1`. The time of day
/// is kept as is.
///
/// # Returns
///
/// `None` if the shifted date falls outside the representable range.
///
/// # Examples
///
/// ```ignore
/// // 2025-05-20 12:00, 3 months -> 2025-03-01 12:00 .. 2025-05-20 12:00
/// let (start, end) = date_range(now, 3).unwrap();
/// ```
pub fn date_range(now: NaiveDateTime, months: i64) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first_of_month = now.with_day(1)?;
    let start = if months > 1 {
        let back = u32::try_from(months - 1).ok()?;
        first_of_month.checked_sub_months(Months::new(back))?
    } else {
        first_of_month
    };
    Some((start, now))
}

/// Count case-sensitive, non-overlapping occurrences of `keyword` in the
/// title plus those in the description.
pub fn count_keyword(keyword: &str, title: &str, description: &str) -> usize {
    title.matches(keyword).count() + description.matches(keyword).count()
}

/// Detect a money-like amount (`$1,200.50`, `500 USD`, `3 dollars`) in `text`.
pub fn contain_money(text: &str) -> bool {
    MONEY_RE.is_match(text)
}

/// File name of a thumbnail: the last segment of its URL path.
///
/// Query strings and fragments are not part of the name. Strings that do not
/// parse as URLs fall back to the text after the last `/`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(picture_file_name("https://img.example.com/a/b.jpg?w=300"), "b.jpg");
/// ```
pub fn picture_file_name(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string(),
        Err(_) => url.rsplit('/').next().unwrap_or_default().to_string(),
    }
}

/// Name of the result spreadsheet for a run started at `now`.
pub fn result_file_name(now: NaiveDateTime) -> String {
    format!("result_{}.xlsx", now.format("%Y%m%d%H%M%S"))
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backed off to a character
/// boundary) with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure an existing directory is writable.
///
/// The directory is not created: the output directory must exist before the
/// run. Writability is checked by creating and immediately deleting a scratch
/// file.
///
/// # Errors
///
/// Returns an error if:
/// - The path does not exist or is not a directory
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    let meta = fs::metadata(path).await?;
    if !meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("{} is not a directory", path.display()),
        ));
    }
    // A small sync write using std fs (simpler error surface)
    let scratch_path = path.join(".news_sheet_write_check");
    stdfs::File::create(&scratch_path)?;
    let _ = stdfs::remove_file(&scratch_path);
    info!("Output directory is writable");
    Ok(())
}
