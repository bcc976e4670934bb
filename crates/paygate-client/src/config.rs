//! Gateway configuration.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::{GatewayError, Result};

/// Default Stripe API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Paths searched for a Stripe secrets file when `STRIPE_API_KEY` is unset.
const SECRET_PATHS: [&str; 3] = [
    ".secrets/stripe.json",
    "paygate/.secrets/stripe.json",
    "../.secrets/stripe.json",
];

/// Configuration for the payment gateway client.
///
/// The API key is validated on construction and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    api_key: String,

    /// API base URL, without the `/v1` suffix (default: `https://api.stripe.com`).
    pub api_base: String,

    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
    #[serde(default)]
    api_base: Option<String>,
}

impl GatewayConfig {
    /// Create a configuration with the given secret API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the key is empty or blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GatewayError::Configuration("No API key found".into()));
        }

        Ok(Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        })
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// The secret API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Load configuration from the process environment.
    ///
    /// Reads `STRIPE_API_KEY`, `STRIPE_API_BASE` and `STRIPE_TIMEOUT_SECONDS`.
    /// When `STRIPE_API_KEY` is unset, falls back to a JSON secrets file
    /// (`.secrets/stripe.json`).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if no API key is found or a
    /// setting cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::from_env`].
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("STRIPE_API_KEY") {
            Some(key) => Self::new(key)?,
            None => load_secrets().ok_or_else(|| {
                GatewayError::Configuration(
                    "No API key found: set STRIPE_API_KEY or provide .secrets/stripe.json".into(),
                )
            })?,
        };

        if let Some(base) = lookup("STRIPE_API_BASE") {
            config = config.with_api_base(base);
        }

        if let Some(raw) = lookup("STRIPE_TIMEOUT_SECONDS") {
            let seconds = raw.trim().parse().map_err(|_| {
                GatewayError::Configuration(format!("invalid STRIPE_TIMEOUT_SECONDS: {raw}"))
            })?;
            config = config.with_timeout_seconds(seconds);
        }

        Ok(config)
    }

    /// Load configuration from a JSON secrets file (`{"api_key": "..."}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the key is empty.
    pub fn from_secrets_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let secrets: StripeSecrets = serde_json::from_str(&contents).map_err(|e| {
            GatewayError::Configuration(format!("cannot parse {}: {e}", path.display()))
        })?;

        let config = Self::new(secrets.api_key)?;
        Ok(match secrets.api_base {
            Some(base) => config.with_api_base(base),
            None => config,
        })
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.api_base.starts_with("https://") || self.api_base.starts_with("http://")) {
            return Err(GatewayError::Configuration(format!(
                "invalid API base URL: {}",
                self.api_base
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(GatewayError::Configuration(
                "timeout must be at least one second".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"[redacted]")
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Load Stripe secrets from the first secrets file found.
fn load_secrets() -> Option<GatewayConfig> {
    for path in &SECRET_PATHS {
        if !Path::new(path).exists() {
            continue;
        }
        match GatewayConfig::from_secrets_file(path) {
            Ok(config) => {
                tracing::info!(path = %path, "Loaded Stripe secrets from file");
                return Some(config);
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Ignoring unreadable Stripe secrets file");
            }
        }
    }

    tracing::debug!("Stripe secrets file not found");
    None
}
