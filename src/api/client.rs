// src/api/client.rs
//! HTTP adapter for the Prismic REST API.
//!
//! This module wraps reqwest for the three requests the blog needs: the
//! repository description (for the master ref), a document search, and a
//! verbatim fetch of a `next_page` URL. Parsing lives in `parser`.

use super::parser;
use super::responses::RawPage;
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::types::{AccessToken, ApiEndpoint, Cursor, DocumentType, PageSize, PostUid};
use reqwest::{header, Client, Response};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;
use url::Url;

/// Client for one content repository.
///
/// Cloning is cheap and clones share the resolved master ref.
#[derive(Clone)]
pub struct PrismicHttpClient {
    client: Client,
    endpoint: ApiEndpoint,
    access_token: Option<AccessToken>,
    document_type: DocumentType,
    retry: RetryPolicy,
    master_ref: Arc<OnceCell<String>>,
}

impl PrismicHttpClient {
    /// Creates a client for the repository at `endpoint`.
    pub fn new(endpoint: ApiEndpoint, access_token: Option<AccessToken>) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            access_token,
            document_type: DocumentType::default(),
            retry: RetryPolicy::default(),
            master_ref: Arc::new(OnceCell::new()),
        })
    }

    pub fn with_document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = document_type;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    /// Makes a GET request, retrying transient failures, and parses the
    /// JSON body with `parse`.
    async fn get_parsed<T, P>(&self, url: Url, parse: P) -> Result<T, AppError>
    where
        P: Fn(ApiResponse<String>) -> Result<T, AppError>,
    {
        retry_with_backoff(
            || async {
                log::debug!("GET {}", redact(&url));
                let response = self.client.get(url.clone()).send().await?;
                let result = extract_response_text(response).await?;
                log::debug!("{} -> {}", redact(&url), result.status);
                parse(result)
            },
            &self.retry,
        )
        .await
    }

    /// Returns the ref of the published content, asking the API once per
    /// client.
    pub async fn master_ref(&self) -> Result<String, AppError> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let url = self.with_token(self.endpoint.as_url().clone());
                let info = self.get_parsed(url, parser::parse_repository_info).await?;
                let reference = info.master_ref().map(str::to_string).ok_or_else(|| {
                    AppError::MalformedResponse(
                        "repository description lists no master ref".to_string(),
                    )
                })?;
                log::info!(
                    "Using master ref of repository '{}'",
                    self.endpoint.repository_name()
                );
                Ok::<_, AppError>(reference)
            })
            .await?;
        Ok(reference.clone())
    }

    /// Builds a document search URL.
    fn search_url(&self, master_ref: &str, query: &str, page_size: PageSize, page: u32) -> Url {
        let mut url = self.endpoint.join("documents/search");
        url.query_pairs_mut()
            .append_pair("ref", master_ref)
            .append_pair("q", query)
            .append_pair("orderings", "[document.first_publication_date desc]")
            .append_pair("pageSize", &page_size.get().to_string())
            .append_pair("page", &page.to_string());
        self.with_token(url)
    }

    fn with_token(&self, mut url: Url) -> Url {
        if let Some(token) = &self.access_token {
            url.query_pairs_mut()
                .append_pair("access_token", token.as_str());
        }
        url
    }

    fn type_query(&self) -> String {
        format!("[[at(document.type, \"{}\")]]", self.document_type)
    }

    fn uid_query(&self, uid: &PostUid) -> String {
        format!("[[at(my.{}.uid, \"{}\")]]", self.document_type, uid)
    }
}

#[async_trait::async_trait]
impl super::ContentSource for PrismicHttpClient {
    async fn fetch_posts_page(
        &self,
        page_size: PageSize,
        cursor: Option<&Cursor>,
    ) -> Result<RawPage, AppError> {
        let url = match cursor {
            Some(cursor) => Url::parse(cursor.as_str()).map_err(|e| {
                AppError::MalformedResponse(format!("next_page is not a URL ({}): {}", e, cursor))
            })?,
            None => {
                let master_ref = self.master_ref().await?;
                self.search_url(&master_ref, &self.type_query(), page_size, 1)
            }
        };
        self.get_parsed(url, parser::parse_page_response).await
    }

    async fn fetch_post_by_identifier(&self, uid: &PostUid) -> Result<Value, AppError> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(&master_ref, &self.uid_query(uid), PageSize::new(1)?, 1);
        let page = self.get_parsed(url, parser::parse_page_response).await?;

        page.results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound {
                uid: uid.to_string(),
            })
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = redact(response.url());
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

/// Renders a URL for logs and error messages without its access token.
fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "access_token") {
        return url.to_string();
    }
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "access_token" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}
