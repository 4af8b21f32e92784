//! Test utilities for gateway testing.
//!
//! Provides fixture key pairs and helpers that play the gateway's side of
//! the protocol: signing synchronous response bodies and asynchronous
//! notifications with the gateway private key.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use alipay_lib::test_utils::{fixtures, signed_response_body, test_credentials};
//!
//! let credentials = test_credentials();
//! let body = signed_response_body(
//!     "alipay_trade_query_response",
//!     r#"{"code":"10000","msg":"Success","trade_status":"TRADE_SUCCESS"}"#,
//! );
//! ```

pub mod fixtures;

pub use fixtures::{
    gateway_signer, sign_notification, signed_response_body, test_credentials, TEST_APP_ID,
};
