//! Error types for catalog loading and external metadata sources.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised outside the ranking core: file loading and remote calls.
#[derive(Debug, Error)]
pub enum EtlError {
    /// An HTTP request to an external source failed.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The external source rejected the request in a way retrying cannot fix.
    #[error("{source_name} rejected the request: {message}")]
    Api {
        source_name: String,
        message: String,
    },

    /// The external source returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// The requested entity was not found at the external source.
    #[error("not found: {entity} at {source_name}")]
    NotFound { entity: String, source_name: String },

    /// A response from an external source could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// A source needs credentials that are not configured.
    #[error("{source_name} is not configured: {message}")]
    NotConfigured {
        source_name: String,
        message: String,
    },

    /// The catalog file is unreadable or lacks a required column.
    #[error("catalog {}: {message}", path.display())]
    Catalog { path: PathBuf, message: String },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error propagated from the ranking core.
    #[error(transparent)]
    Core(#[from] consonance_core::Error),
}

impl EtlError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` when the error indicates the entity was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn http(source_name: &str, message: impl Into<String>) -> Self {
        Self::Http {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn api(source_name: &str, message: impl Into<String>) -> Self {
        Self::Api {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    /// Classify an unsuccessful HTTP status: 429 is a rate limit, 5xx is
    /// transient, anything else is a permanent rejection.
    pub(crate) fn from_status(source_name: &str, status: StatusCode) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited {
                source_name: source_name.to_string(),
            }
        } else if status.is_server_error() {
            Self::http(source_name, status.to_string())
        } else {
            Self::api(source_name, status.to_string())
        }
    }

    pub(crate) fn parse(source_name: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience alias for ETL results.
pub type EtlResult<T> = std::result::Result<T, EtlError>;
