// src/api/mod.rs
//! Content API interaction: the ability to retrieve posts from the
//! content repository.
//!
//! I/O lives in `client`, response parsing in `parser`, and conversion to
//! the view model in `normalizer`.

pub mod client;
pub mod normalizer;
pub mod parser;
pub mod responses;
mod simple_pagination;
mod types;

use crate::error::AppError;
use crate::types::{Cursor, PageSize, PostUid};
use responses::RawPage;
use serde_json::Value;
use std::collections::HashSet;

/// The ability to read posts from a paginated content source.
///
/// Business logic depends on this trait, never on HTTP details, and always
/// receives it as an explicitly constructed value.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetches one page of posts. Without a cursor this is the first page;
    /// with a cursor, the page the cursor names (its own page size wins).
    async fn fetch_posts_page(
        &self,
        page_size: PageSize,
        cursor: Option<&Cursor>,
    ) -> Result<RawPage, AppError>;

    /// Fetches the raw record of one post, or [`AppError::NotFound`].
    async fn fetch_post_by_identifier(&self, uid: &PostUid) -> Result<Value, AppError>;

    /// Fetches the page a "load more" action asks for.
    async fn fetch_next_page(&self, cursor: &Cursor) -> Result<RawPage, AppError> {
        self.fetch_posts_page(PageSize::maximum(), Some(cursor)).await
    }

    /// Enumerates the uid of every post by walking all pages in order.
    ///
    /// Records without a usable uid are logged and skipped; a uid seen twice
    /// is kept once.
    async fn list_all_post_identifiers(&self) -> Result<Vec<PostUid>, AppError> {
        let pages = simple_pagination::fetch_all_pages_simple(
            |page_size, cursor| async move { self.fetch_posts_page(page_size, cursor.as_ref()).await },
            PageSize::maximum(),
            None,
        )
        .await?;

        let mut seen = HashSet::new();
        let mut uids = Vec::with_capacity(pages.total_fetched());
        for (position, record) in pages.items.iter().enumerate() {
            match normalizer::extract_uid(record) {
                Ok(uid) => {
                    if seen.insert(uid.clone()) {
                        uids.push(uid);
                    }
                }
                Err(e) => log::warn!("Skipping record {} while listing posts: {}", position, e),
            }
        }

        log::info!(
            "Found {} posts across {} pages",
            uids.len(),
            pages.pages_fetched
        );
        Ok(uids)
    }
}

// Re-export the public interface
pub use client::PrismicHttpClient;
pub use normalizer::{normalize, normalize_summary};
