//! Alipay open-platform gateway client.
//!
//! Every call to the gateway is a signed envelope: protocol fields plus a
//! JSON business payload, canonicalized and signed with the merchant's RSA
//! key (RSA2: SHA-256, PKCS#1 v1.5). Every answer is verified against the
//! gateway's public key before any of it reaches the caller, and inbound
//! notifications go through the same check.
//!
//! # Features
//!
//! - **Canonical signing**: [`canonical`] builds the exact bytes that get
//!   signed and verified
//! - **Verified responses**: [`AlipayClient`] never returns a business
//!   fragment whose signature did not match
//! - **Notifications**: [`notify`] verifies and decodes asynchronous trade
//!   notifications
//! - **Transport Abstraction**: trait-based transport, reqwest by default
//!
//! # Example
//!
//! ```ignore
//! use alipay_lib::prelude::*;
//!
//! let config = GatewayConfig::sandbox("2014072300007148")
//!     .with_key_paths("keys/app_private_key.pem", "keys/alipay_public_key.pem");
//! let client = AlipayClient::from_config(config)?;
//!
//! let reply = client
//!     .query(&QueryParam::by_out_trade_no("20150320010101001"), &EnvelopeOptions::new())
//!     .await?;
//! if reply.data.trade_status.is_paid() {
//!     // ship it
//! }
//! ```

pub mod canonical;
pub mod client;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod errors;
pub mod notify;
pub mod prelude;
pub mod response;
pub mod trade;
pub mod transport;

/// Test utilities for gateway testing.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use canonical::{canonicalize, Params};
pub use client::AlipayClient;
pub use config::GatewayConfig;
pub use crypto::{Credentials, Signer, Verifier};
pub use envelope::{EnvelopeOptions, SignedRequest};
pub use errors::{AlipayError, AlipayErrorCode, KeyError};
pub use notify::Notification;
pub use response::GatewayResponse;
pub use transport::{HttpTransport, Transport, TransportResponse};

/// Common result alias for gateway operations.
pub type Result<T> = std::result::Result<T, AlipayError>;
