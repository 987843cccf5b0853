//! Article extraction from search pages.
//!
//! Each page returned by the search API is processed by [`articles::read_articles`],
//! which turns every article into an [`ArticleInfo`](crate::models::ArticleInfo):
//!
//! | Field | Source |
//! |-------|--------|
//! | `title`, `description` | copied from the article |
//! | `date` | the article's `published_time` |
//! | `picture_file_name` | last path segment of the thumbnail URL, or `ERROR` |
//! | `count_keyword` | keyword occurrences in title plus description |
//! | `contain_money` | money-like amount in title or description |
//!
//! Thumbnails are downloaded by a [`thumbnails::ThumbnailFetcher`] into the
//! output directory. A failed download only marks that one record.

pub mod articles;
pub mod thumbnails;
