// tests/common/mod.rs
//! Shared fixtures: an in-memory content source serving the records of
//! `tests/fixtures/posts.json` in pages.

#![allow(dead_code)]

use prismic_blog::{AppError, ContentSource, Cursor, PageSize, PostUid, RawPage};
use serde_json::Value;
use std::sync::Mutex;

pub const POSTS_JSON: &str = include_str!("../fixtures/posts.json");

pub fn fixture_posts() -> Vec<Value> {
    serde_json::from_str(POSTS_JSON).unwrap()
}

/// Pages through a fixed list of records. Cursors look like
/// `memory://posts?page=N&pageSize=S`.
pub struct InMemorySource {
    records: Vec<Value>,
    /// Cursors that fail once with a transport-like error before working
    failing_cursors: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<Option<String>>>,
}

impl InMemorySource {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            failing_cursors: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fixture_posts() -> Self {
        Self::new(fixture_posts())
    }

    pub fn fail_once(&self, cursor: &str) {
        self.failing_cursors.lock().unwrap().push(cursor.to_string());
    }

    pub fn cursor_for(page: usize, page_size: u32) -> String {
        format!("memory://posts?page={}&pageSize={}", page, page_size)
    }

    fn page(&self, page: usize, page_size: u32) -> RawPage {
        let size = page_size as usize;
        let total_pages = self.records.len().div_ceil(size).max(1);
        let results = self
            .records
            .iter()
            .skip((page - 1) * size)
            .take(size)
            .cloned()
            .collect();
        let next_page = if page < total_pages {
            Some(Self::cursor_for(page + 1, page_size))
        } else {
            None
        };

        RawPage {
            page: page as u32,
            results,
            next_page,
            prev_page: None,
            results_per_page: Some(page_size),
            results_size: None,
            total_results_size: Some(self.records.len() as u32),
            total_pages: Some(total_pages as u32),
        }
    }
}

fn parse_cursor(cursor: &str) -> Option<(usize, u32)> {
    let query = cursor.strip_prefix("memory://posts?")?;
    let mut page = None;
    let mut size = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("page", n)) => page = n.parse().ok(),
            Some(("pageSize", n)) => size = n.parse().ok(),
            _ => {}
        }
    }
    Some((page?, size?))
}

#[async_trait::async_trait]
impl ContentSource for InMemorySource {
    async fn fetch_posts_page(
        &self,
        page_size: PageSize,
        cursor: Option<&Cursor>,
    ) -> Result<RawPage, AppError> {
        self.requests
            .lock()
            .unwrap()
            .push(cursor.map(|c| c.as_str().to_string()));

        let Some(cursor) = cursor else {
            return Ok(self.page(1, page_size.get()));
        };

        {
            let mut failing = self.failing_cursors.lock().unwrap();
            if let Some(index) = failing.iter().position(|c| c == cursor.as_str()) {
                failing.remove(index);
                return Err(AppError::MalformedResponse("connection reset".to_string()));
            }
        }

        let (page, size) = parse_cursor(cursor.as_str())
            .ok_or_else(|| AppError::MalformedResponse(format!("unknown cursor {}", cursor)))?;
        Ok(self.page(page, size))
    }

    async fn fetch_post_by_identifier(&self, uid: &PostUid) -> Result<Value, AppError> {
        self.records
            .iter()
            .find(|record| record.get("uid").and_then(Value::as_str) == Some(uid.as_str()))
            .cloned()
            .ok_or_else(|| AppError::NotFound {
                uid: uid.to_string(),
            })
    }
}
