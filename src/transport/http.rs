use tracing::debug;

use super::{Transport, is_url};
use crate::errors::RouteError;

/// Fetches datasets with a single blocking HTTP GET.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    base_url: Option<String>,
}

impl HttpTransport {
    /// Transport that only accepts absolute URLs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport resolving relative asset paths against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }

    /// Absolute URL for `location`.
    pub fn resolve(&self, source_id: &str, location: &str) -> Result<String, RouteError> {
        if is_url(location) {
            return Ok(location.trim().to_string());
        }
        let base = self.base_url.as_deref().ok_or_else(|| {
            RouteError::Configuration(format!(
                "page '{source_id}' uses relative location '{location}' but no base URL is set"
            ))
        })?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            location.trim_start_matches('/')
        ))
    }
}

impl Transport for HttpTransport {
    fn describe(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "http(absolute urls)".to_string())
    }

    fn fetch_text(&self, source_id: &str, location: &str) -> Result<String, RouteError> {
        let url = self.resolve(source_id, location)?;
        debug!("[route_planner:http] GET {}", url);
        let response = ureq::get(&url).call().map_err(|err| match err {
            ureq::Error::StatusCode(status) => RouteError::HttpStatus {
                source_id: source_id.to_string(),
                status,
            },
            other => RouteError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: format!("GET {url} failed: {other}"),
            },
        })?;

        response
            .into_body()
            .read_to_string()
            .map_err(|err| RouteError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: format!("failed reading response body from {url}: {err}"),
            })
    }
}
