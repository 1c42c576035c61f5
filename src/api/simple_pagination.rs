// src/api/simple_pagination.rs
//! Sequential traversal of every page of a search.

use super::responses::RawPage;
use super::types::PaginationResult;
use crate::error::AppError;
use crate::types::{Cursor, PageSize};
use serde_json::Value;

/// Fetches all pages by following `next_page` cursors until the source
/// reports no further page.
///
/// Stops early when `max_pages` is reached or when the source hands back
/// the cursor it was just given, which would otherwise loop forever.
pub async fn fetch_all_pages_simple<F, Fut>(
    mut fetch_fn: F,
    page_size: PageSize,
    max_pages: Option<u32>,
) -> Result<PaginationResult<Value>, AppError>
where
    F: FnMut(PageSize, Option<Cursor>) -> Fut,
    Fut: std::future::Future<Output = Result<RawPage, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor: Option<Cursor> = None;
    let mut pages_fetched = 0u32;

    loop {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(page_size, cursor.clone()).await?;
        pages_fetched += 1;

        let next = Cursor::from_next_page(response.next_page.as_deref());
        log::debug!(
            "Fetched page {} ({} records, more: {})",
            response.page,
            response.results.len(),
            next.is_some()
        );
        all_items.extend(response.results);

        match next {
            Some(next) if cursor.as_ref() == Some(&next) => {
                log::warn!("Source returned the same cursor twice, stopping at {}", next);
                break;
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(PaginationResult {
        items: all_items,
        pages_fetched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn page(number: u32, uids: &[&str], next: Option<&str>) -> RawPage {
        RawPage {
            page: number,
            results: uids.iter().map(|uid| json!({ "uid": uid })).collect(),
            next_page: next.map(str::to_string),
            prev_page: None,
            results_per_page: None,
            results_size: None,
            total_results_size: None,
            total_pages: None,
        }
    }

    #[tokio::test]
    async fn follows_cursors_in_order() {
        let seen = Mutex::new(Vec::new());
        let result = fetch_all_pages_simple(
            |_, cursor| {
                seen.lock().unwrap().push(cursor.clone());
                async move {
                    Ok(match cursor.as_ref().map(Cursor::as_str) {
                        None => page(1, &["a", "b"], Some("http://src/p2")),
                        Some("http://src/p2") => page(2, &["c"], Some("http://src/p3")),
                        _ => page(3, &["d"], None),
                    })
                }
            },
            PageSize::maximum(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.pages_fetched, 3);
        let uids: Vec<_> = result.items.iter().map(|v| v["uid"].clone()).collect();
        assert_eq!(uids, vec![json!("a"), json!("b"), json!("c"), json!("d")]);
        assert_eq!(seen.lock().unwrap()[0], None);
    }

    #[tokio::test]
    async fn stops_on_repeated_cursor() {
        let result = fetch_all_pages_simple(
            |_, _| async { Ok(page(1, &["a"], Some("http://src/same"))) },
            PageSize::maximum(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.pages_fetched, 2);
    }

    #[tokio::test]
    async fn respects_page_limit() {
        let result = fetch_all_pages_simple(
            |_, _| async { Ok(page(1, &["a"], Some("http://src/next"))) },
            PageSize::maximum(),
            Some(1),
        )
        .await
        .unwrap();

        assert_eq!(result.total_fetched(), 1);
    }
}
