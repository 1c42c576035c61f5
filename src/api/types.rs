// src/api/types.rs
//! Type definitions shared by the content API operations.

/// Result of walking every page of a paginated search.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
}

impl<T> PaginationResult<T> {
    pub fn total_fetched(&self) -> usize {
        self.items.len()
    }
}
