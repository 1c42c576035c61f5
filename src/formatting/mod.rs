// src/formatting/mod.rs
//! Turns the view model into display text and HTML pages.

pub mod dates;
pub mod rich_text;
pub mod templates;

pub use dates::{format_display_date, month_abbreviations, parse_publication_timestamp};
pub use rich_text::rich_text_to_html;
pub use templates::{
    embeddable_json, ListingEntry, ListingView, NotFoundView, PageRenderer, PostView, SectionView,
};
