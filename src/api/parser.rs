// src/api/parser.rs
//! Turns raw HTTP responses into typed API values or classified errors.

use super::client::ApiResponse;
use super::responses::{ApiErrorBody, RawPage, RepositoryInfo};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, ContentErrorCode};
use reqwest::StatusCode;

/// Parse any content API response
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        Err(parse_error(&result.data, result.status, &result.url))
    }
}

/// Parse a page of search results
pub fn parse_page_response(result: ApiResponse<String>) -> Result<RawPage, AppError> {
    let page: RawPage = parse_api_response(result)?;
    if page.page == 0 {
        return Err(AppError::MalformedResponse(
            "page numbers start at 1, got 0".to_string(),
        ));
    }
    Ok(page)
}

/// Parse the repository description served at the API root
pub fn parse_repository_info(result: ApiResponse<String>) -> Result<RepositoryInfo, AppError> {
    parse_api_response(result)
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

/// Builds the error for an unsuccessful status, using the API's error
/// message when the body carries one.
fn parse_error(body: &str, status: StatusCode, url: &str) -> AppError {
    let described = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|error| error.describe());

    let message = match described {
        Some(message) => message,
        None if body.trim().is_empty() => format!("HTTP {} from {}", status, url),
        None => format!("HTTP {} from {}: {}", status, url, preview(body)),
    };

    log::debug!("Content API error {}: {}", status, message);

    AppError::ContentService {
        code: ContentErrorCode::from_http_status(status.as_u16()),
        message,
        status,
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}
