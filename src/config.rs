//! Runtime configuration for the deployable bridge binary.
//!
//! The normalizers take no configuration; only the upstream dispatcher does.

use anyhow::{Context, Result};
use std::time::Duration;

pub const UPSTREAM_URL_VAR: &str = "UPSTREAM_URL";
pub const UPSTREAM_TIMEOUT_VAR: &str = "UPSTREAM_TIMEOUT_MS";

const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Base URL of the application; the canonical request URL is appended to it.
    pub upstream_url: String,
    pub upstream_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_timeout: Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
        }
    }
}

impl BridgeConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for unset keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream URL is not http(s) or the timeout is not a positive
    /// number of milliseconds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let upstream_url = lookup(UPSTREAM_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.upstream_url);
        if !(upstream_url.starts_with("http://") || upstream_url.starts_with("https://")) {
            anyhow::bail!("{UPSTREAM_URL_VAR} must be an http(s) URL, got {upstream_url}");
        }

        let upstream_timeout = match lookup(UPSTREAM_TIMEOUT_VAR) {
            Some(raw) => {
                let millis: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{UPSTREAM_TIMEOUT_VAR} must be an integer, got {raw}"))?;
                if millis == 0 {
                    anyhow::bail!("{UPSTREAM_TIMEOUT_VAR} must be greater than zero");
                }
                Duration::from_millis(millis)
            }
            None => defaults.upstream_timeout,
        };

        Ok(Self {
            upstream_url,
            upstream_timeout,
        })
    }
}
