//! Client for the contact-form relay endpoint.
//!
//! The relay accepts `{name, email, message}` as JSON and answers 2xx when the
//! message was forwarded. Delivery itself happens server-side.

use serde::Serialize;
use tracing::{info, warn};

use crate::constants::config::CONTACT_ENDPOINT;
use crate::errors::RouteError;
use crate::transport::is_url;

const CONTACT_SOURCE_ID: &str = "contact";

/// Visitor message posted to the relay.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    /// Sender name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Message body.
    pub message: String,
}

impl ContactMessage {
    /// Build a message from its three fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Reject the message when any field is blank.
    pub fn validate(&self) -> Result<(), RouteError> {
        let missing: Vec<String> = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field.to_string())
        .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RouteError::ValidationIncomplete { missing })
        }
    }
}

/// Posts contact messages to the relay.
#[derive(Clone, Debug)]
pub struct ContactRelay {
    endpoint: String,
}

impl ContactRelay {
    /// Relay at an explicit endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Relay at the default endpoint path under `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            CONTACT_ENDPOINT
        ))
    }

    /// Full relay URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate and POST `message`. Only a 2xx answer counts as sent.
    pub fn submit(&self, message: &ContactMessage) -> Result<(), RouteError> {
        message.validate()?;
        if !is_url(&self.endpoint) {
            return Err(RouteError::Configuration(format!(
                "contact endpoint '{}' is not an http(s) URL",
                self.endpoint
            )));
        }
        let result = ureq::post(&self.endpoint).send_json(message);
        match result {
            Ok(_) => {
                info!("[route_planner:contact] message relayed to {}", self.endpoint);
                Ok(())
            }
            Err(ureq::Error::StatusCode(status)) => {
                warn!(
                    "[route_planner:contact] relay {} answered HTTP {}",
                    self.endpoint, status
                );
                Err(RouteError::HttpStatus {
                    source_id: CONTACT_SOURCE_ID.to_string(),
                    status,
                })
            }
            Err(err) => Err(RouteError::SourceUnavailable {
                source_id: CONTACT_SOURCE_ID.to_string(),
                reason: format!("POST {} failed: {err}", self.endpoint),
            }),
        }
    }
}
