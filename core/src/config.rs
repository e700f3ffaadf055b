//! Client configuration.
//!
//! # Design
//! `ClientConfig` is fixed at facade construction. Only the API key may be
//! replaced afterwards (see `EpistemicMeClient::set_api_key`). It can be
//! built fluently, deserialized from camelCase JSON/TOML, or read from
//! `EPISTEMIC_ME_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Whether requests travel as protobuf binary or proto3 JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Json,
    Binary,
}

impl WireFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            WireFormat::Json => "application/json",
            WireFormat::Binary => "application/proto",
        }
    }
}

/// Which ambient credentials accompany a request, with fetch semantics.
///
/// The client itself never sets `cookie` or `authorization`, and
/// `UreqExecutor` keeps no cookie jar, so with the default executor this
/// mode changes nothing on the wire. It matters to custom `HttpExecutor`s:
/// the mode travels in `HttpRequest::credentials`, and the transport strips
/// `cookie`/`authorization` headers that interceptors added when the mode
/// forbids them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    #[default]
    Include,
    Omit,
    SameOrigin,
}

impl FromStr for Credentials {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "include" => Ok(Credentials::Include),
            "omit" => Ok(Credentials::Omit),
            "same-origin" => Ok(Credentials::SameOrigin),
            other => Err(ConfigError::Invalid {
                key: "credentials",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub use_binary_format: bool,
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            use_binary_format: false,
            credentials: Credentials::default(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            api_key: None,
            origin: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_binary_format(mut self, enabled: bool) -> Self {
        self.use_binary_format = enabled;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    /// Read configuration from `EPISTEMIC_ME_*` environment variables.
    ///
    /// `EPISTEMIC_ME_BASE_URL` is required; every other variable falls back
    /// to its default when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("EPISTEMIC_ME_BASE_URL").ok_or(ConfigError::Missing("EPISTEMIC_ME_BASE_URL"))?;
        let mut config = ClientConfig::new(base_url);

        config.api_key = lookup("EPISTEMIC_ME_API_KEY").filter(|key| !key.is_empty());
        config.origin = lookup("EPISTEMIC_ME_ORIGIN");

        if let Some(raw) = lookup("EPISTEMIC_ME_TIMEOUT_MS") {
            config.default_timeout_ms = raw.parse().map_err(|_| ConfigError::Invalid {
                key: "EPISTEMIC_ME_TIMEOUT_MS",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("EPISTEMIC_ME_BINARY") {
            config.use_binary_format = match raw.as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "EPISTEMIC_ME_BINARY",
                        value: raw,
                    })
                }
            };
        }
        if let Some(raw) = lookup("EPISTEMIC_ME_CREDENTIALS") {
            config.credentials = raw.parse()?;
        }
        Ok(config)
    }

    pub fn wire_format(&self) -> WireFormat {
        if self.use_binary_format {
            WireFormat::Binary
        } else {
            WireFormat::Json
        }
    }

    /// The configured timeout, or `DEFAULT_TIMEOUT_MS` when it is zero.
    pub fn timeout(&self) -> Duration {
        match self.default_timeout_ms {
            0 => Duration::from_millis(DEFAULT_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }

    /// The configured origin, or `DEFAULT_ORIGIN` when unset or empty.
    pub fn resolved_origin(&self) -> &str {
        match self.origin.as_deref() {
            Some(origin) if !origin.is_empty() => origin,
            _ => DEFAULT_ORIGIN,
        }
    }
}
