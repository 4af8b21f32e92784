//! Network transport for gateway calls.
//!
//! The gateway client owns exactly one [`Transport`], built once and shared
//! by every call. The default [`HttpTransport`] wraps a pooled
//! `reqwest::Client`, which is safe to use from many tasks at once.
//!
//! # Feature Flags
//!
//! [`HttpTransport`] performs real requests only with the `http-executor`
//! feature (on by default). Without it every request returns
//! [`AlipayError::Unimplemented`]; injected transports still work.

use async_trait::async_trait;
#[cfg(feature = "http-executor")]
use std::time::Duration;

use crate::{AlipayError, Result};

/// Raw HTTP response as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Full response body.
    pub body: Vec<u8>,
}

/// Something that can perform a GET and return the full body.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Transport: Send + Sync {
    /// Fetch `url` and read the whole body.
    async fn get(&self, url: &str) -> Result<TransportResponse>;
}

/// Reqwest-backed transport with a client-wide timeout.
pub struct HttpTransport {
    timeout_secs: u64,
    #[cfg(feature = "http-executor")]
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout_secs`.
    #[cfg(feature = "http-executor")]
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                AlipayError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            timeout_secs,
            client,
        })
    }

    /// Create a transport (stub when feature disabled).
    #[cfg(not(feature = "http-executor"))]
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self { timeout_secs })
    }

    /// Configured timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Make a GET request and read the full body.
    #[cfg(feature = "http-executor")]
    async fn fetch(&self, url: &str) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }

    /// Make a GET request (stub when feature disabled).
    #[cfg(not(feature = "http-executor"))]
    async fn fetch(&self, _url: &str) -> Result<TransportResponse> {
        Err(AlipayError::Unimplemented(
            "HTTP transport not compiled - enable the 'http-executor' feature",
        ))
    }

    /// Map reqwest errors to AlipayError.
    ///
    /// The request URL carries signed parameters, so it is stripped from
    /// every message.
    #[cfg(feature = "http-executor")]
    fn map_reqwest_error(&self, url: &str, e: reqwest::Error) -> AlipayError {
        if e.is_timeout() {
            AlipayError::ConnectionTimeout {
                operation: "gateway request".to_string(),
                timeout_ms: self.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            AlipayError::ConnectionFailed {
                target: strip_query(url).to_string(),
                reason: e.without_url().to_string(),
            }
        } else {
            AlipayError::Transport(format!("gateway request failed: {}", e.without_url()))
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        self.fetch(url).await
    }
}

/// Drop the query string so signed parameters never reach error messages.
fn strip_query(url: &str) -> &str {
    url.split_once('?').map(|(base, _)| base).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(
            strip_query("https://openapi.alipay.com/gateway.do?app_id=1&sign=abc"),
            "https://openapi.alipay.com/gateway.do"
        );
        assert_eq!(strip_query("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn test_transport_keeps_timeout() {
        let transport = HttpTransport::new(15).unwrap();
        assert_eq!(transport.timeout_secs(), 15);
    }

    #[cfg(feature = "http-executor")]
    #[tokio::test]
    async fn test_connection_refused_maps_to_connection_failed() {
        let transport = HttpTransport::new(5).unwrap();
        // Port 9 (discard) is closed on test hosts.
        let err = transport
            .get("http://127.0.0.1:9/gateway.do?sign=secret")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(!err.to_string().contains("secret"));
    }
}
