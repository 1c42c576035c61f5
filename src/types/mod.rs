use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid post uid: {0}")]
    InvalidUid(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: u32, min: u32, max: u32 },

    #[error("Invalid access token: {reason}")]
    InvalidAccessToken { reason: String },

    #[error("Unsupported locale: {0} (expected pt-BR or en-US)")]
    UnsupportedLocale(String),

    #[error("Invalid document type: {name} - {reason}")]
    InvalidDocumentType { name: String, reason: String },
}
