use std::io;

use thiserror::Error;

use crate::types::{AttributeName, SourceId};

/// Error type for dataset loading, decoding, and caller-side validation failures.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Network or filesystem failure before a body was read.
    #[error("data source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable {
        /// Page (or relay) the request was made for.
        source_id: SourceId,
        /// Diagnostic text from the transport.
        reason: String,
    },
    /// The server answered with a non-success status.
    #[error("data source '{source_id}' answered with HTTP status {status}")]
    HttpStatus {
        /// Page (or relay) the request was made for.
        source_id: SourceId,
        /// Status code received.
        status: u16,
    },
    /// The body is not a valid document of the configured format.
    #[error("data source '{source_id}' returned an unreadable document: {details}")]
    Parse {
        /// Page the document was loaded for.
        source_id: SourceId,
        /// What was wrong with the document.
        details: String,
    },
    /// Caller input is missing required values.
    #[error("selection is incomplete; missing: {}", missing.join(", "))]
    ValidationIncomplete {
        /// Attributes (or form fields) without a value.
        missing: Vec<AttributeName>,
    },
    /// Invalid page or relay configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RouteError {
    /// True for failures that end the page session (fetch or decode failures).
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            RouteError::SourceUnavailable { .. }
                | RouteError::HttpStatus { .. }
                | RouteError::Parse { .. }
                | RouteError::Io(_)
        )
    }
}
