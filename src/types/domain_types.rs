// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use crate::constants::PRISMIC_MAX_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Access token for a private content repository.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        let token = token.trim();

        if token.is_empty() {
            return Err(ValidationError::InvalidAccessToken {
                reason: "access token cannot be empty".to_string(),
            });
        }

        if token.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidAccessToken {
                reason: "access token cannot contain whitespace".to_string(),
            });
        }

        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // No part of the secret is ever printed
        write!(f, "*** ({} chars)", self.0.chars().count())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self)
    }
}

/// Root URL of a content repository's REST API, e.g.
/// `https://spacetravelling.cdn.prismic.io/api/v2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint(Url);

impl ApiEndpoint {
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        let trimmed = url.trim().trim_end_matches('/');
        match Url::parse(trimmed) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(ValidationError::InvalidUrl {
                        url: url.to_string(),
                        reason: "Only HTTP and HTTPS URLs are supported".to_string(),
                    });
                }
                if parsed.host_str().is_none() {
                    return Err(ValidationError::InvalidUrl {
                        url: url.to_string(),
                        reason: "URL has no host".to_string(),
                    });
                }
                Ok(Self(parsed))
            }
            Err(e) => Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The repository name is the first label of the endpoint host
    /// (`spacetraveling` for `spacetravelling.cdn.prismic.io`).
    pub fn repository_name(&self) -> &str {
        self.0
            .host_str()
            .and_then(|host| host.split('.').next())
            .unwrap_or_default()
    }

    /// Builds the URL of a path below the endpoint.
    pub fn join(&self, path: &str) -> Url {
        let mut url = self.0.clone();
        let joined = format!("{}/{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of records requested per page, within the API's accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageSize(u32);

impl PageSize {
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 || value > PRISMIC_MAX_PAGE_SIZE {
            return Err(ValidationError::OutOfBounds {
                value,
                min: 1,
                max: PRISMIC_MAX_PAGE_SIZE,
            });
        }
        Ok(Self(value))
    }

    /// The largest page the API serves.
    pub fn maximum() -> Self {
        Self(PRISMIC_MAX_PAGE_SIZE)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Custom type of the documents that make up the blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentType(String);

impl DocumentType {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::InvalidDocumentType {
                name,
                reason: "document type cannot be empty".to_string(),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidDocumentType {
                name,
                reason: "only letters, numbers, '_' and '-' are allowed".to_string(),
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        Self(crate::constants::DEFAULT_DOCUMENT_TYPE.to_string())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locale used to display publication dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLocale {
    #[default]
    PtBr,
    EnUs,
}

impl DisplayLocale {
    pub fn tag(self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::EnUs => "en-US",
        }
    }
}

impl FromStr for DisplayLocale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Self::PtBr),
            "en-us" | "en" => Ok(Self::EnUs),
            other => Err(ValidationError::UnsupportedLocale(other.to_string())),
        }
    }
}

impl fmt::Display for DisplayLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
