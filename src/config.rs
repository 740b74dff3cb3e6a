//! Environment-backed service configuration.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::hos::{RuleSetTag, UnknownRuleSet};

const DEFAULT_ORACLE_URL: &str = "http://router.project-osrm.org/route/v1/driving";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the routing oracle (`ROUTING_ORACLE_URL`).
    pub routing_oracle_url: String,
    /// Deadline for each oracle request (`ROUTING_TIMEOUT_SECONDS`).
    pub routing_timeout: Duration,
    /// HOS rule set applied to every request (`DEFAULT_RULE_SET`).
    pub default_rule_set: RuleSetTag,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let routing_oracle_url =
            lookup("ROUTING_ORACLE_URL").unwrap_or_else(|| DEFAULT_ORACLE_URL.to_string());

        let routing_timeout = match lookup("ROUTING_TIMEOUT_SECONDS") {
            Some(raw) => {
                let seconds: u64 = raw.parse().map_err(|_| ConfigError::InvalidTimeout(raw))?;
                Duration::from_secs(seconds)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        };

        let default_rule_set = match lookup("DEFAULT_RULE_SET") {
            Some(raw) => raw.parse()?,
            None => RuleSetTag::Interstate,
        };

        Ok(Self {
            routing_oracle_url,
            routing_timeout,
            default_rule_set,
        })
    }

    /// Log warnings for values that are valid but probably wrong.
    pub fn validate(&self) {
        if !self.routing_oracle_url.starts_with("http://")
            && !self.routing_oracle_url.starts_with("https://")
        {
            warn!(
                url = %self.routing_oracle_url,
                "Routing oracle URL does not look like an HTTP endpoint"
            );
        }
        if self.routing_timeout.is_zero() {
            warn!("ROUTING_TIMEOUT_SECONDS is 0 — every oracle request will fail immediately");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ROUTING_TIMEOUT_SECONDS must be a non-negative integer, got {0:?}")]
    InvalidTimeout(String),
    #[error(transparent)]
    UnknownRuleSet(#[from] UnknownRuleSet),
}
