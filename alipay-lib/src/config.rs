//! Gateway client configuration.
//!
//! # Environment Variables
//!
//! [`GatewayConfig::from_env`] reads:
//! - `ALIPAY_APP_ID` - application id (required)
//! - `ALIPAY_PRIVATE_KEY_PATH` - merchant private key file (required)
//! - `ALIPAY_PUBLIC_KEY_PATH` - gateway public key file (required)
//! - `ALIPAY_GATEWAY_URL` - gateway endpoint (defaults to production)
//! - `ALIPAY_NOTIFY_URL` - default notification URL (optional)
//! - `ALIPAY_TIMEOUT_SECS` - request timeout in seconds (optional)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AlipayError, Result};

/// Production gateway.
pub const PRODUCTION_GATEWAY: &str = "https://openapi.alipay.com/gateway.do";

/// Sandbox gateway.
pub const SANDBOX_GATEWAY: &str = "https://openapi-sandbox.dl.alipaydev.com/gateway.do";

/// Configuration for [`AlipayClient`](crate::AlipayClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Application id assigned by the provider.
    pub app_id: String,

    /// Gateway endpoint URL.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Request timeout in seconds, applied client-wide.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Merchant private key file (PEM or bare base64).
    #[serde(default)]
    pub private_key_path: Option<String>,

    /// Gateway public key file (PEM or bare base64).
    #[serde(default)]
    pub gateway_public_key_path: Option<String>,

    /// Default `notify_url` for operations that take one.
    #[serde(default)]
    pub notify_url: Option<String>,
}

fn default_gateway_url() -> String {
    PRODUCTION_GATEWAY.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl GatewayConfig {
    /// Create a configuration for `gateway_url`.
    pub fn new(app_id: impl Into<String>, gateway_url: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            gateway_url: gateway_url.into(),
            timeout_secs: default_timeout(),
            private_key_path: None,
            gateway_public_key_path: None,
            notify_url: None,
        }
    }

    /// Configuration for the production gateway.
    pub fn production(app_id: impl Into<String>) -> Self {
        Self::new(app_id, PRODUCTION_GATEWAY)
    }

    /// Configuration for the sandbox gateway.
    pub fn sandbox(app_id: impl Into<String>) -> Self {
        Self::new(app_id, SANDBOX_GATEWAY)
    }

    /// Set the gateway URL.
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set both key file paths.
    pub fn with_key_paths(
        mut self,
        private_key_path: impl Into<String>,
        gateway_public_key_path: impl Into<String>,
    ) -> Self {
        self.private_key_path = Some(private_key_path.into());
        self.gateway_public_key_path = Some(gateway_public_key_path.into());
        self
    }

    /// Set the default notification URL.
    pub fn with_notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    /// Whether this points at the sandbox gateway.
    pub fn is_sandbox(&self) -> bool {
        self.gateway_url.contains("alipaydev.com")
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AlipayError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            AlipayError::Configuration(format!("invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `ALIPAY_*` environment variables.
    ///
    /// Returns `None` when the app id or either key path is missing.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let app_id = lookup("ALIPAY_APP_ID")?;
        let private_key_path = lookup("ALIPAY_PRIVATE_KEY_PATH")?;
        let public_key_path = lookup("ALIPAY_PUBLIC_KEY_PATH")?;

        let mut config = Self::production(app_id).with_key_paths(private_key_path, public_key_path);
        if let Some(url) = lookup("ALIPAY_GATEWAY_URL") {
            config.gateway_url = url;
        }
        if let Some(url) = lookup("ALIPAY_NOTIFY_URL") {
            config.notify_url = Some(url);
        }
        if let Some(secs) = lookup("ALIPAY_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            config.timeout_secs = secs;
        }
        Some(config)
    }

    /// Check the fields a client cannot work without.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(AlipayError::Configuration("app_id cannot be empty".into()));
        }
        if self.gateway_url.is_empty() {
            return Err(AlipayError::Configuration(
                "gateway_url cannot be empty".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AlipayError::Configuration(
                "timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
