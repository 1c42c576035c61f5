use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters the content source allows in a uid, restricted to what is safe
/// as a single URL path segment and file name.
static UID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N}._~-]*$").expect("uid pattern is a valid regex")
});

/// Stable identifier (slug) of a post, assigned by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostUid(String);

impl PostUid {
    /// Parses a uid, trimming surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("uid"));
        }
        if !UID_PATTERN.is_match(trimmed) {
            return Err(ValidationError::InvalidUid(format!(
                "'{}' contains characters that cannot appear in a page path",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for PostUid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        PostUid::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Opaque position in the source's pagination, as issued in `next_page`.
///
/// The value is a full URL and is always used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Builds a cursor from a raw `next_page` value; empty or missing means
    /// there are no further pages.
    pub fn from_next_page(next_page: Option<&str>) -> Option<Self> {
        match next_page.map(str::trim) {
            Some(value) if !value.is_empty() => Some(Self(value.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_parsing() {
        let uid = PostUid::parse("como-utilizar-hooks").unwrap();
        assert_eq!(uid.as_str(), "como-utilizar-hooks");

        let uid = PostUid::parse("  criando-um-app-cra-do-zero ").unwrap();
        assert_eq!(uid.as_str(), "criando-um-app-cra-do-zero");

        assert!(PostUid::parse("ação-2021").is_ok());
    }

    #[test]
    fn test_invalid_uids() {
        assert!(matches!(
            PostUid::parse(""),
            Err(ValidationError::EmptyField("uid"))
        ));
        assert!(PostUid::parse("../etc/passwd").is_err());
        assert!(PostUid::parse("two words").is_err());
        assert!(PostUid::parse("a/b").is_err());
    }

    #[test]
    fn test_cursor_from_next_page() {
        assert_eq!(Cursor::from_next_page(None), None);
        assert_eq!(Cursor::from_next_page(Some("")), None);
        assert_eq!(Cursor::from_next_page(Some("   ")), None);

        let cursor = Cursor::from_next_page(Some("https://x.cdn.prismic.io/api/v2?page=2")).unwrap();
        assert_eq!(cursor.as_str(), "https://x.cdn.prismic.io/api/v2?page=2");
    }
}
