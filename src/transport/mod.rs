//! Transports fetch a dataset body for a page.
//!
//! `HttpTransport` talks to the static host; `FsTransport` serves the same
//! asset paths from a local site root.

use std::sync::Arc;

use crate::errors::RouteError;

/// Local static-asset directory transport.
pub mod fs;
/// HTTP transport backed by `ureq`.
pub mod http;

pub use fs::FsTransport;
pub use http::HttpTransport;

/// Fetches the UTF-8 body stored at a dataset location.
pub trait Transport: Send + Sync {
    /// Human-readable description used in logs (base URL or root directory).
    fn describe(&self) -> String;

    /// Fetch `location` on behalf of `source_id`.
    ///
    /// Exactly one attempt is made; there is no retry and no timeout beyond
    /// what the underlying client imposes.
    fn fetch_text(&self, source_id: &str, location: &str) -> Result<String, RouteError>;
}

/// Pick a transport for an asset base: `http://`/`https://` bases go over HTTP,
/// anything else is treated as a local site root.
pub fn transport_for_base(base: &str) -> Arc<dyn Transport> {
    if is_url(base) {
        Arc::new(HttpTransport::with_base_url(base))
    } else {
        Arc::new(FsTransport::new(base))
    }
}

/// True when `location` is an absolute `http`/`https` URL.
pub fn is_url(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
