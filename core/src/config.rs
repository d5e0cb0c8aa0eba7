//! Client configuration loaded from the environment.
//!
//! Service locations and API keys are out-of-band values: they are read once
//! at startup and baked into the endpoint families, never negotiated per
//! request.

use std::time::Duration;

use thiserror::Error;

use crate::endpoint::ServiceBase;

pub const DATA_URL_VAR: &str = "BOXOFFICE_DATA_URL";
pub const DATA_KEY_VAR: &str = "BOXOFFICE_DATA_KEY";
pub const IMAGE_URL_VAR: &str = "BOXOFFICE_IMAGE_URL";
pub const IMAGE_KEY_VAR: &str = "BOXOFFICE_IMAGE_KEY";
pub const TIMEOUT_VAR: &str = "BOXOFFICE_TIMEOUT_SECS";

pub const DEFAULT_DATA_URL: &str = "http://www.kobis.or.kr";
pub const DEFAULT_IMAGE_URL: &str = "https://dapi.kakao.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Location and credential for one remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base: ServiceBase,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub data_service: ServiceConfig,
    pub image_search: ServiceConfig,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_service = ServiceConfig {
            base: parse_base(DATA_URL_VAR, lookup(DATA_URL_VAR).as_deref().unwrap_or(DEFAULT_DATA_URL))?,
            api_key: required(&lookup, DATA_KEY_VAR)?,
        };
        let image_search = ServiceConfig {
            base: parse_base(IMAGE_URL_VAR, lookup(IMAGE_URL_VAR).as_deref().unwrap_or(DEFAULT_IMAGE_URL))?,
            api_key: required(&lookup, IMAGE_KEY_VAR)?,
        };
        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: TIMEOUT_VAR,
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            data_service,
            image_search,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: concat!("boxoffice/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var).as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn parse_base(var: &'static str, raw: &str) -> Result<ServiceBase, ConfigError> {
    ServiceBase::parse(raw).map_err(|_| ConfigError::Invalid {
        var,
        reason: format!("not an absolute http(s) URL: {raw}"),
    })
}
