//! Error types for clubsync

use std::time::Duration;
use thiserror::Error;

/// Result type alias for clubsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Prompt failed: {0}")]
    Dialoguer(String),

    #[error("Could not encode output as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is the membership-term-expired condition.
    pub fn is_term_expired(&self) -> bool {
        matches!(self, Error::Api(api) if api.is_term_expired())
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Remote API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Run `clubsync init` to set up your API token.")]
    Unauthorized,

    #[error("The club API refused this request for your account.")]
    Forbidden,

    /// 403 carrying the term-expired code. Never absorbed into cache fallback.
    #[error("Your membership term has expired. Renew your membership to keep syncing.")]
    TermExpired,

    #[error("Not found on the club server: {0}")]
    NotFound(String),

    #[error("Club API is throttling requests; retry in {0:?}")]
    RateLimit(Duration),

    #[error("Club API rejected the request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Club API unreachable: {0}")]
    Network(String),

    #[error("Unexpected response from the club API: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether this is the membership-term-expired condition.
    pub fn is_term_expired(&self) -> bool {
        matches!(self, ApiError::TermExpired)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "timed out".to_string()
        } else if err.is_connect() {
            "connection refused or host down".to_string()
        } else {
            err.to_string()
        };
        ApiError::Network(reason)
    }
}

/// Local store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Local store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Local store I/O error: {0}")]
    Io(String),

    #[error("Failed to (de)serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Collection {collection} has no index named {index}")]
    UnknownIndex {
        collection: &'static str,
        index: &'static str,
    },

    #[error("Local store schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: i32, supported: i32 },
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `clubsync init` to set up.")]
    NotFound,

    #[error("Config file is not valid YAML: {0}")]
    ParseError(String),

    #[error("Bad config value: {0}")]
    Invalid(String),

    #[error("Could not write config file: {0}")]
    SaveError(String),

    #[error("API token not configured. Run `clubsync init` to set up your API token.")]
    MissingApiToken,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
