//! Credential loading.
//!
//! All parameters come from a single JSON file; the binary itself takes no
//! required arguments. Required keys are `url`, `username`, `password`, and
//! `proxy_url`. `timeout_ms` and `headless` are optional overrides.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{HoursError, Result};
use crate::wait::WaitConfig;

/// Portal credentials and launch settings, loaded once at startup and
/// read-only for the rest of the run.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Portal entry URL.
    pub url: String,
    pub username: String,
    pub password: String,
    /// Proxy auto-configuration URL the browser fetches routing rules from.
    pub proxy_url: String,
    /// Override for the uniform wait bound, in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Whether to run the browser headless. Defaults to true.
    #[serde(default)]
    pub headless: Option<bool>,
}

impl Credentials {
    /// Load and validate credentials from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            HoursError::Configuration(format!("cannot read {}: {err}", path.display()))
        })?;
        let credentials: Credentials = serde_json::from_str(&raw).map_err(|err| {
            HoursError::Configuration(format!("invalid config {}: {err}", path.display()))
        })?;
        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("url", &self.url),
            ("username", &self.username),
            ("password", &self.password),
            ("proxy_url", &self.proxy_url),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(HoursError::Configuration(format!(
                    "required key `{key}` is empty"
                )));
            }
        }
        Ok(())
    }

    /// Wait bound for every polled condition in the run.
    pub fn wait_config(&self) -> WaitConfig {
        match self.timeout_ms {
            Some(ms) => WaitConfig {
                timeout: Duration::from_millis(ms),
                ..WaitConfig::default()
            },
            None => WaitConfig::default(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("proxy_url", &self.proxy_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("headless", &self.headless)
            .finish()
    }
}
