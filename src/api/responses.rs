// src/api/responses.rs
//! Wire shapes of the content API.
//!
//! Page envelopes are typed; the records inside `results` stay as raw JSON so
//! one malformed record can be rejected without losing the whole page.

use crate::model::RichTextBlock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of search results, exactly as the API delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// 1-based sequence number of this page
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Value>,
    /// URL of the following page; null or empty on the last page
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

/// Repository description returned by the API root.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub refs: Vec<RepositoryRef>,
}

impl RepositoryInfo {
    /// The ref of the currently published content.
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

/// Error body of an unsuccessful API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ApiErrorBody {
    pub fn describe(&self) -> Option<String> {
        let message = self.message.as_ref().or(self.error.as_ref())?;
        Some(match &self.kind {
            Some(kind) => format!("{}: {}", kind, message),
            None => message.clone(),
        })
    }
}

// --- Raw post record ---

/// A post record before normalization. Every field is optional; the
/// normalizer decides what is required.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub data: Option<RawPostData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPostData {
    #[serde(default)]
    pub title: Option<RawText>,
    #[serde(default)]
    pub subtitle: Option<RawText>,
    #[serde(default)]
    pub author: Option<RawText>,
    #[serde(default)]
    pub banner: Option<RawImage>,
    #[serde(default)]
    pub content: Option<Vec<RawSection>>,
}

/// Text fields are either key-text strings or rich text arrays depending on
/// how the custom type was modelled.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Plain(String),
    Rich(Vec<RichTextBlock>),
    Other(Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    #[serde(default)]
    pub heading: Option<RawText>,
    #[serde(default)]
    pub body: Option<Vec<RichTextBlock>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_ref_is_selected() {
        let json = r#"{
            "refs": [
                {"id": "preview", "ref": "YH1", "label": "Next release", "isMasterRef": false},
                {"id": "master", "ref": "YHwKtBEAACMA_", "label": "Master", "isMasterRef": true}
            ]
        }"#;
        let info: RepositoryInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.master_ref(), Some("YHwKtBEAACMA_"));
    }

    #[test]
    fn page_with_null_next_page() {
        let json = r#"{"page": 3, "results": [], "next_page": null, "total_pages": 3}"#;
        let page: RawPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 3);
        assert!(page.next_page.is_none());
        assert_eq!(page.total_pages, Some(3));
    }
}
