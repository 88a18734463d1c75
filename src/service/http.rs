//! Blocking HTTP client for the Bot Control Service.
//!
//! Uses the synchronous `ureq` client. Every request carries the configured
//! timeout, so a hung service costs one poll tick at most; the next timer
//! tick issues a fresh request.
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::wire::{ConfigPayload, LogsResponse, RemoteConfig, StatusResponse};
use super::{BotService, Endpoint, ServiceError};
use crate::config::schema::ServiceSettings;

/// `ureq`-backed [`BotService`].
#[derive(Debug, Clone)]
pub struct HttpBotService {
    base_url: String,
    timeout: Duration,
}

impl HttpBotService {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Build a client from the `[service]` settings section.
    pub fn from_settings(settings: &ServiceSettings) -> Self {
        Self::new(&settings.base_url, settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ServiceError> {
        let resp = ureq::get(&self.url(endpoint))
            .timeout(self.timeout)
            .call()
            .map_err(|e| classify(endpoint, e))?;

        resp.into_json().map_err(|e| ServiceError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }

    /// POST with no body; the reply body is ignored.
    fn post_command(&self, endpoint: Endpoint) -> Result<(), ServiceError> {
        ureq::post(&self.url(endpoint))
            .timeout(self.timeout)
            .call()
            .map_err(|e| classify(endpoint, e))?;
        Ok(())
    }
}

/// Split `ureq` failures into non-2xx replies and transport failures.
fn classify(endpoint: Endpoint, err: ureq::Error) -> ServiceError {
    match err {
        ureq::Error::Status(status, _) => ServiceError::Status { endpoint, status },
        ureq::Error::Transport(transport) => ServiceError::Transport {
            endpoint,
            message: transport.to_string(),
        },
    }
}

impl BotService for HttpBotService {
    fn status(&self) -> Result<StatusResponse, ServiceError> {
        self.get_json(Endpoint::Status)
    }

    fn start(&self) -> Result<(), ServiceError> {
        self.post_command(Endpoint::Start)
    }

    fn stop(&self) -> Result<(), ServiceError> {
        self.post_command(Endpoint::Stop)
    }

    fn load_config(&self) -> Result<RemoteConfig, ServiceError> {
        self.get_json(Endpoint::LoadConfig)
    }

    fn save_config(&self, payload: &ConfigPayload) -> Result<(), ServiceError> {
        let endpoint = Endpoint::SaveConfig;
        ureq::post(&self.url(endpoint))
            .timeout(self.timeout)
            .send_json(payload)
            .map_err(|e| classify(endpoint, e))?;
        Ok(())
    }

    fn logs(&self) -> Result<LogsResponse, ServiceError> {
        self.get_json(Endpoint::Logs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
