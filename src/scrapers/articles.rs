//! Per-article extraction with one worker per article.
//!
//! [`read_articles`] fans a page out to one tokio task per article, with no
//! concurrency cap, and joins all of them before returning. Each worker
//! reports its article index, and its record lands in the slot of that index,
//! so the output order matches the page order whatever order the workers
//! finish in.

use super::thumbnails::ThumbnailFetcher;
use crate::models::{Article, ArticleInfo, Page};
use crate::utils::{contain_money, count_keyword, picture_file_name};
use anyhow::{Context, anyhow};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, instrument};

/// `picture_file_name` of an article whose thumbnail could not be saved.
pub const DOWNLOAD_ERROR: &str = "ERROR";

/// Extract every article of `page` concurrently.
///
/// # Returns
///
/// One [`ArticleInfo`] per article, in page order.
///
/// # Errors
///
/// Only when a worker panics. Thumbnail failures are absorbed by the worker.
#[instrument(level = "info", skip_all, fields(articles = page.articles.len()))]
pub async fn read_articles(
    keyword: &str,
    page: &Page,
    thumbnails: Arc<dyn ThumbnailFetcher>,
    output_dir: &Path,
) -> anyhow::Result<Vec<ArticleInfo>> {
    let total = page.articles.len();
    let mut workers = JoinSet::new();

    for (index, article) in page.articles.iter().cloned().enumerate() {
        let keyword = keyword.to_string();
        let thumbnails = Arc::clone(&thumbnails);
        let output_dir: PathBuf = output_dir.to_path_buf();
        workers.spawn(
            async move {
                let info =
                    extract_article(&article, &keyword, thumbnails.as_ref(), &output_dir, index, total)
                        .await;
                (index, info)
            }
            .with_current_subscriber(),
        );
    }

    let mut slots: Vec<Option<ArticleInfo>> = vec![None; total];
    while let Some(joined) = workers.join_next().await {
        let (index, info) = joined.context("article worker did not complete")?;
        slots[index] = Some(info);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.with_context(|| format!("article slot {index} was never filled")))
        .collect()
}

/// Derive the record of one article and save its thumbnail.
///
/// A failed thumbnail download is logged and turns `picture_file_name` into
/// [`DOWNLOAD_ERROR`]; the other fields are kept.
#[instrument(level = "info", skip_all, fields(article = index + 1, total = total))]
pub async fn extract_article(
    article: &Article,
    keyword: &str,
    thumbnails: &dyn ThumbnailFetcher,
    output_dir: &Path,
    index: usize,
    total: usize,
) -> ArticleInfo {
    info!("Extracting article");
    let text = format!("{}{}", article.title, article.description);

    let mut info = ArticleInfo {
        title: article.title.clone(),
        date: article.published_time.clone(),
        description: article.description.clone(),
        picture_file_name: article
            .thumbnail
            .as_ref()
            .map(|t| picture_file_name(&t.url))
            .unwrap_or_default(),
        count_keyword: count_keyword(keyword, &article.title, &article.description),
        contain_money: contain_money(&text),
    };

    if let Err(e) = save_thumbnail(article, &info.picture_file_name, thumbnails, output_dir).await {
        error!(error = %format!("{e:#}"), "Download image error");
        info.picture_file_name = DOWNLOAD_ERROR.to_string();
    }

    info!("Completed article");
    info
}

async fn save_thumbnail(
    article: &Article,
    file_name: &str,
    thumbnails: &dyn ThumbnailFetcher,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let url = article
        .thumbnail
        .as_ref()
        .map(|t| t.url.as_str())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| anyhow!("article has no thumbnail"))?;
    if file_name.is_empty() {
        return Err(anyhow!("thumbnail URL {url} has no file name"));
    }
    thumbnails
        .download(url, &output_dir.join(file_name))
        .await
        .with_context(|| format!("downloading {url}"))?;
    Ok(())
}
