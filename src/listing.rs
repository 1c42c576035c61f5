// src/listing.rs
//! Incremental "load more" state for the post listing.
//!
//! A listing starts empty, merges the first page on `load_first`, and then
//! appends one page per `load_next` until the source reports no further
//! page. State only changes after a page has been fetched successfully, so a
//! failed load can simply be retried.

use crate::api::normalizer::normalize_summary;
use crate::api::responses::RawPage;
use crate::api::ContentSource;
use crate::error::AppError;
use crate::model::PostSummary;
use crate::types::{Cursor, PageSize, PostUid};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Accumulated listing: every merged post plus where to continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPage {
    pub items: Vec<PostSummary>,
    /// Absent once the last page has been merged
    pub next_cursor: Option<Cursor>,
    /// Last page number successfully merged, starting at 1
    pub page_number: u32,
}

/// Where a listing is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    Empty,
    Loaded { page: u32 },
    Exhausted { page: u32 },
}

/// A record of a page that could not be shown in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record within its page
    pub position: usize,
    pub reason: String,
}

/// Outcome of merging one page into the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub page_number: u32,
    pub appended: usize,
    pub duplicates: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// The post listing of one page view.
pub struct PostListing {
    source: Arc<dyn ContentSource>,
    page_size: PageSize,
    page: Option<PostPage>,
    seen: HashSet<PostUid>,
}

impl PostListing {
    pub fn new(source: Arc<dyn ContentSource>, page_size: PageSize) -> Self {
        Self {
            source,
            page_size,
            page: None,
            seen: HashSet::new(),
        }
    }

    pub fn state(&self) -> ListingState {
        match &self.page {
            None => ListingState::Empty,
            Some(page) if page.next_cursor.is_some() => ListingState::Loaded {
                page: page.page_number,
            },
            Some(page) => ListingState::Exhausted {
                page: page.page_number,
            },
        }
    }

    /// Fetches and merges the first page.
    pub async fn load_first(&mut self) -> Result<MergeReport, AppError> {
        if self.page.is_some() {
            return Err(AppError::ListingAlreadyLoaded);
        }

        let raw = self.source.fetch_posts_page(self.page_size, None).await?;
        Ok(self.merge(raw))
    }

    /// Fetches the page after the last merged one and appends it.
    ///
    /// On failure the listing is left exactly as it was.
    pub async fn load_next(&mut self) -> Result<MergeReport, AppError> {
        let cursor = match self.state() {
            ListingState::Empty => return Err(AppError::NoCursorAvailable),
            ListingState::Exhausted { .. } => return Err(AppError::AlreadyExhausted),
            ListingState::Loaded { .. } => self
                .next_cursor()
                .cloned()
                .ok_or(AppError::AlreadyExhausted)?,
        };

        log::debug!("Loading more posts from {}", cursor);
        let raw = self.source.fetch_next_page(&cursor).await?;
        Ok(self.merge(raw))
    }

    /// Every merged post, in the order the source delivered them.
    pub fn current_items(&self) -> &[PostSummary] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or_default()
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor().is_some()
    }

    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.page.as_ref().and_then(|p| p.next_cursor.as_ref())
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page.as_ref().map(|p| p.page_number)
    }

    /// The accumulated state, for embedding in a rendered page.
    pub fn snapshot(&self) -> Option<&PostPage> {
        self.page.as_ref()
    }

    fn merge(&mut self, raw: RawPage) -> MergeReport {
        let expected = self.page_number().map_or(1, |n| n + 1);
        if raw.page != expected {
            log::warn!(
                "Source returned page {} where page {} was expected",
                raw.page,
                expected
            );
        }

        let mut report = MergeReport {
            page_number: raw.page,
            appended: 0,
            duplicates: 0,
            skipped: Vec::new(),
        };
        let mut appended = Vec::with_capacity(raw.results.len());

        for (position, record) in raw.results.iter().enumerate() {
            match normalize_summary(record) {
                Ok(summary) => {
                    if self.seen.insert(summary.id.clone()) {
                        appended.push(summary);
                    } else {
                        log::warn!(
                            "Post '{}' on page {} is already listed, skipping",
                            summary.id,
                            raw.page
                        );
                        report.duplicates += 1;
                    }
                }
                Err(e) => {
                    log::warn!(
                        "Skipping record {} of page {}: {}",
                        position,
                        raw.page,
                        e
                    );
                    report.skipped.push(SkippedRecord {
                        position,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.appended = appended.len();
        let next_cursor = Cursor::from_next_page(raw.next_page.as_deref());

        match &mut self.page {
            Some(page) => {
                page.items.extend(appended);
                page.next_cursor = next_cursor;
                page.page_number = raw.page;
            }
            None => {
                self.page = Some(PostPage {
                    items: appended,
                    next_cursor,
                    page_number: raw.page,
                });
            }
        }

        log::info!(
            "Merged page {}: {} posts appended, {} listed in total{}",
            report.page_number,
            report.appended,
            self.current_items().len(),
            if self.has_more() { "" } else { ", no more pages" }
        );
        report
    }
}
