//! Router Errors

use thiserror::Error;

/// Errors raised by route declaration, href building and query decoding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    /// Same pattern declared twice in one registry
    #[error("Route with pattern \"{0}\" was already registered")]
    DuplicatePattern(String),

    /// Route added to a route table twice, or never declared
    #[error("Route with pattern \"{0}\" was already configured")]
    RouteAlreadyConfigured(String),

    /// Declared route with no route table entry
    #[error("Route with pattern \"{0}\" should be configured")]
    RouteNotConfigured(String),

    #[error("Invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Browser API unavailable: {0}")]
    Browser(String),

    #[error("Base64 decode error: {0}")]
    Base64(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<base64::DecodeError> for RouterError {
    fn from(e: base64::DecodeError) -> Self {
        RouterError::Base64(e.to_string())
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(e: serde_json::Error) -> Self {
        RouterError::Json(e.to_string())
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
