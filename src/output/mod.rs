// src/output/mod.rs
//! Output handling with planning separated from execution.
//!
//! Builders describe what should be written as an [`OutputPlan`]; only
//! [`deliver`] performs I/O.

mod paths;
mod types;
mod writer;

pub use paths::{index_page_path, not_found_page_path, post_href, post_page_path};
pub use types::{
    CompletedOperation, DeliveryTarget, ExecutionStats, FailedOperation, OutputPlan, OutputReport,
};
pub use writer::{deliver, deliver_all};
