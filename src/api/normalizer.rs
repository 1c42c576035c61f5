// src/api/normalizer.rs
//! Converts raw API records into the view model.
//!
//! Normalization is a pure function of the raw record: it never formats
//! dates, never re-orders content, and always produces owned values.

use super::responses::{RawImage, RawPost, RawPostData, RawSection, RawText};
use crate::error::AppError;
use crate::model::{Banner, ContentSection, Post, PostSummary, RichTextBlock};
use crate::types::PostUid;
use serde::Deserialize;
use serde_json::Value;

/// Normalizes one raw record into a [`Post`].
///
/// Missing text fields become empty strings. Fails with
/// [`AppError::InvalidRecord`] when the record is absent, is not an object,
/// has no usable `uid`, or has fields of an unreadable shape.
pub fn normalize(raw: &Value) -> Result<Post, AppError> {
    if raw.is_null() {
        return Err(AppError::InvalidRecord("record is absent".to_string()));
    }
    if !raw.is_object() {
        return Err(AppError::InvalidRecord(format!(
            "expected a JSON object, found {}",
            json_kind(raw)
        )));
    }

    let record = RawPost::deserialize(raw)
        .map_err(|e| AppError::InvalidRecord(format!("unreadable record: {}", e)))?;

    let uid = record
        .uid
        .as_deref()
        .ok_or_else(|| AppError::InvalidRecord("record has no uid".to_string()))?;
    let id = PostUid::parse(uid).map_err(|e| AppError::InvalidRecord(e.to_string()))?;

    let data = record.data.unwrap_or_default();

    Ok(Post {
        id,
        publication_timestamp: record.first_publication_date,
        title: text_or_empty(data.title.as_ref(), "title"),
        subtitle: text_or_empty(data.subtitle.as_ref(), "subtitle"),
        author: text_or_empty(data.author.as_ref(), "author"),
        banner: convert_banner(data.banner.as_ref()),
        content: convert_sections(&data),
    })
}

/// Normalizes a record into the listing shape.
pub fn normalize_summary(raw: &Value) -> Result<PostSummary, AppError> {
    normalize(raw).map(Post::into_summary)
}

/// Reads only the uid of a record, for enumerating detail pages.
pub fn extract_uid(raw: &Value) -> Result<PostUid, AppError> {
    let uid = raw
        .get("uid")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::InvalidRecord("record has no uid".to_string()))?;
    PostUid::parse(uid).map_err(|e| AppError::InvalidRecord(e.to_string()))
}

// --- Field conversion ---

fn text_or_empty(text: Option<&RawText>, field: &str) -> String {
    match text {
        None => String::new(),
        Some(RawText::Plain(value)) => value.clone(),
        Some(RawText::Rich(blocks)) => blocks
            .iter()
            .map(|block| block.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Some(RawText::Other(value)) => {
            log::debug!(
                "Field '{}' has unsupported shape ({}), using empty string",
                field,
                json_kind(value)
            );
            String::new()
        }
    }
}

fn convert_banner(image: Option<&RawImage>) -> Option<Banner> {
    let image = image?;
    let url = image.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
    Some(Banner {
        url: url.to_string(),
        alt: image.alt.clone().filter(|alt| !alt.is_empty()),
    })
}

fn convert_sections(data: &RawPostData) -> Vec<ContentSection> {
    data.content
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(convert_section)
        .collect()
}

fn convert_section(section: &RawSection) -> ContentSection {
    ContentSection {
        heading: text_or_empty(section.heading.as_ref(), "heading"),
        body: section
            .body
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(RichTextBlock::clone)
            .collect(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
