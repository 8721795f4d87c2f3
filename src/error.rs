//! Error types for crawling, exporting and cleaning.
//!
//! Only configuration problems are meant to reach the user as hard failures.
//! Per-link transport errors are absorbed by [`crate::fetch`] and reduce to
//! "this link contributes nothing".

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the scraper and the cleaner.
#[derive(Error, Debug)]
pub enum ScraperError {
    /// The requested site identifier is not present in the configuration.
    ///
    /// Raised before any network activity begins.
    #[error("Unknown news site '{site_id}' (configured: {})", .available.join(", "))]
    UnknownSite {
        site_id: String,
        available: Vec<String>,
    },

    /// The configuration file could not be read or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A CSS selector from the site queries failed to parse.
    #[error("Invalid selector '{selector}' for {query}: {reason}")]
    Selector {
        query: &'static str,
        selector: String,
        reason: String,
    },

    /// HTTP request errors from reqwest (connect, timeout, body decoding).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// A required column is missing from an input table.
    #[error("Column '{column}' not found in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// Delimited file reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File system errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScraperError {
    /// Whether this error came from the network layer and is worth retrying.
    pub fn is_transport(&self) -> bool {
        matches!(self, ScraperError::Http(_) | ScraperError::Status { .. })
    }
}

/// Result type alias for [`ScraperError`].
pub type Result<T> = std::result::Result<T, ScraperError>;
