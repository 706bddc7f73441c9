//! Error types for the suite runner
//!
//! Errors fall into three groups: fatal configuration errors raised while a
//! suite is being declared, transport failures during credential bootstrap,
//! and step outcomes that the executor records as a suite failure.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the runner
#[derive(Error, Debug)]
pub enum Error {
    // === Suite Configuration Errors ===
    #[error("Error parsing base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("No base URL set. Call base_url() before bootstrapping credentials or issuing requests")]
    MissingBaseUrl,

    #[error("Cannot combine endpoint '{endpoint}' with base URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    // === Credential Bootstrap Errors ===
    #[error("OAuth request could not be completed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("OAuth endpoint returned {status}{}", body_suffix(.body))]
    AuthRejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Error decoding OAuth response: {0}")]
    TokenDecode(String),

    // === Step Errors ===
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    #[error("Step panicked: {0}")]
    StepPanicked(String),

    // === Runner Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

impl Error {
    /// Create an invalid base URL error
    pub fn invalid_base_url(url: &str, reason: impl ToString) -> Self {
        Self::InvalidBaseUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint(endpoint: &str, reason: impl ToString) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Whether this error means the test setup itself is broken.
    ///
    /// Fatal errors must stop the declaring flow; they are never test outcomes.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvalidBaseUrl { .. }
                | Error::MissingBaseUrl
                | Error::InvalidEndpoint { .. }
                | Error::AuthRejected { .. }
                | Error::TokenDecode(_)
                | Error::Config(_)
                | Error::ConfigParse(_)
                | Error::FileRead { .. }
        )
    }

    /// Whether credential bootstrap failed before any response was obtained
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejected_message_includes_body() {
        let err = Error::AuthRejected {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "invalid_grant".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "OAuth endpoint returned 401 Unauthorized: invalid_grant"
        );

        let err = Error::AuthRejected {
            status: reqwest::StatusCode::FORBIDDEN,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "OAuth endpoint returned 403 Forbidden");
    }

    #[test]
    fn test_classification() {
        assert!(Error::MissingBaseUrl.is_fatal());
        assert!(Error::invalid_base_url("::", "relative URL without a base").is_fatal());
        assert!(Error::TokenDecode("eof".to_string()).is_fatal());
        assert!(!Error::TestAssertion("nope".to_string()).is_fatal());
        assert!(!Error::StepPanicked("boom".to_string()).is_transport());
    }
}
