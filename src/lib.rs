// src/lib.rs
//! prismic-blog library: pages through blog posts from the Prismic content
//! API and renders them as HTML.
//!
//! # Public API
//!
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `SiteConfig`, `CommandLineInput`
//! - **Content source**: `ContentSource`, `PrismicHttpClient`, `normalize`
//! - **View model**: `Post`, `PostSummary`, `ContentSection`, `RichTextBlock`
//! - **Listing**: `PostListing`, `PostPage`, `ListingState`
//! - **Detail support**: `compute_reading_time`, `format_display_date`
//! - **Site**: `generate_site`, `static_paths`, `render_post_on_demand`

pub mod analytics;
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod formatting;
pub mod listing;
pub mod model;
pub mod output;
pub mod site;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ContentErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Command, CommandLineInput, SiteConfig};
pub use crate::error_recovery::RetryPolicy;

// --- Domain Types ---
pub use crate::types::{
    AccessToken, ApiEndpoint, Cursor, DisplayLocale, DocumentType, PageSize, PostUid,
};

// --- View Model ---
pub use crate::model::{
    Banner, ContentSection, Post, PostSummary, RichTextBlock, RichTextKind, Span, SpanData,
    SpanKind,
};

// --- Content Source ---
pub use crate::api::{
    normalize, normalize_summary,
    responses::{RawPage, RepositoryInfo},
    ContentSource, PrismicHttpClient,
};

// --- Listing ---
pub use crate::listing::{ListingState, MergeReport, PostListing, PostPage, SkippedRecord};

// --- Detail Support ---
pub use crate::analytics::{compute_reading_time, measure_content, ContentMeasurement};
pub use crate::formatting::{format_display_date, rich_text_to_html, PageRenderer};

// --- Site ---
pub use crate::site::{
    generate_site, load_post, render_post_on_demand, static_paths, BuildOptions, BuildReport,
    RenderedPage, StaticPaths,
};
