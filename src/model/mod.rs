// src/model/mod.rs
//! The rendering-ready view model of a blog post.
//!
//! Values here are produced only by the normalizer and never borrow from
//! the raw API records they were built from.

mod rich_text;

pub use rich_text::{RichTextBlock, RichTextKind, Span, SpanData, SpanKind};

use crate::types::PostUid;
use serde::{Deserialize, Serialize};

/// A fully normalized post, as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostUid,
    /// Raw publication timestamp as delivered by the source; `None` only for
    /// content that has not been published.
    pub publication_timestamp: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: Option<Banner>,
    pub content: Vec<ContentSection>,
}

impl Post {
    /// Drops the detail-only fields.
    pub fn into_summary(self) -> PostSummary {
        PostSummary {
            id: self.id,
            publication_timestamp: self.publication_timestamp,
            title: self.title,
            subtitle: self.subtitle,
            author: self.author,
        }
    }
}

/// The listing shape of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: PostUid,
    pub publication_timestamp: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
    pub alt: Option<String>,
}

/// One titled section of a post body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub heading: String,
    pub body: Vec<RichTextBlock>,
}
