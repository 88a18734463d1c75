//! Client side of the Bot Control Service HTTP/JSON contract.
//!
//! [`BotService`] is the seam every panel routine talks through; the
//! production implementation is [`HttpBotService`] (blocking `ureq`), tests
//! substitute in-memory fakes.

pub mod http;
pub mod wire;

use std::fmt;

use thiserror::Error;

pub use http::HttpBotService;
pub use wire::{ConfigPayload, LogsResponse, RemoteConfig, StatusResponse};

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// The six endpoints exposed by the Bot Control Service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Status,
    Start,
    Stop,
    LoadConfig,
    SaveConfig,
    Logs,
}

impl Endpoint {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Status | Self::LoadConfig | Self::Logs => "GET",
            Self::Start | Self::Stop | Self::SaveConfig => "POST",
        }
    }

    /// Origin-relative path.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Status => "/api/status",
            Self::Start => "/api/start",
            Self::Stop => "/api/stop",
            Self::LoadConfig | Self::SaveConfig => "/api/config",
            Self::Logs => "/api/logs",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure talking to the Bot Control Service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No HTTP response at all: connection refused, DNS failure, timeout.
    #[error("{endpoint} failed: {message}")]
    Transport { endpoint: Endpoint, message: String },

    /// The service answered with a non-2xx status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },

    /// The body was not the JSON we expected.
    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: Endpoint, message: String },
}

impl ServiceError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => *endpoint,
        }
    }

    /// HTTP status for [`ServiceError::Status`], `None` otherwise.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// Operations offered by the Bot Control Service.
pub trait BotService {
    /// `GET /api/status`
    fn status(&self) -> Result<StatusResponse, ServiceError>;
    /// `POST /api/start`
    fn start(&self) -> Result<(), ServiceError>;
    /// `POST /api/stop`
    fn stop(&self) -> Result<(), ServiceError>;
    /// `GET /api/config`
    fn load_config(&self) -> Result<RemoteConfig, ServiceError>;
    /// `POST /api/config`: only the HTTP status of the reply matters.
    fn save_config(&self, payload: &ConfigPayload) -> Result<(), ServiceError>;
    /// `GET /api/logs`
    fn logs(&self) -> Result<LogsResponse, ServiceError>;
}

impl<T: BotService + ?Sized> BotService for &T {
    fn status(&self) -> Result<StatusResponse, ServiceError> {
        (**self).status()
    }

    fn start(&self) -> Result<(), ServiceError> {
        (**self).start()
    }

    fn stop(&self) -> Result<(), ServiceError> {
        (**self).stop()
    }

    fn load_config(&self) -> Result<RemoteConfig, ServiceError> {
        (**self).load_config()
    }

    fn save_config(&self, payload: &ConfigPayload) -> Result<(), ServiceError> {
        (**self).save_config(payload)
    }

    fn logs(&self) -> Result<LogsResponse, ServiceError> {
        (**self).logs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths_and_methods() {
        assert_eq!(Endpoint::Status.to_string(), "GET /api/status");
        assert_eq!(Endpoint::SaveConfig.to_string(), "POST /api/config");
        assert_eq!(Endpoint::LoadConfig.path(), Endpoint::SaveConfig.path());
        assert_eq!(Endpoint::Stop.method(), "POST");
    }

    #[test]
    fn error_accessors() {
        let err = ServiceError::Status {
            endpoint: Endpoint::SaveConfig,
            status: 422,
        };
        assert_eq!(err.status_code(), Some(422));
        assert_eq!(err.endpoint(), Endpoint::SaveConfig);
        assert_eq!(err.to_string(), "POST /api/config returned HTTP 422");

        let err = ServiceError::Transport {
            endpoint: Endpoint::Start,
            message: "connection refused".into(),
        };
        assert_eq!(err.status_code(), None);
    }
}
