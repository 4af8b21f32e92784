//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use alipay_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Client and configuration: `AlipayClient`, `GatewayConfig`, `Credentials`
//! - Error types: `AlipayError`, `AlipayErrorCode`, `Result`
//! - Request building: `EnvelopeOptions`, `Params`
//! - Trade operations: parameter and response types, `Method`, `Reply`

// Client
pub use crate::client::AlipayClient;
pub use crate::config::{GatewayConfig, PRODUCTION_GATEWAY, SANDBOX_GATEWAY};
pub use crate::crypto::Credentials;

// Error handling
pub use crate::errors::{AlipayError, AlipayErrorCode};
pub use crate::Result;

// Request building
pub use crate::canonical::Params;
pub use crate::envelope::EnvelopeOptions;

// Notifications
pub use crate::notify::{Notification, NOTIFY_ACK};

// Trade operations
pub use crate::trade::{
    AppPayParam, CancelParam, CloseParam, FastpayRefundQueryParam, Method, PagePayParam,
    PayParam, PrecreateParam, QueryParam, RefundParam, Reply, ResponseStatus, TradeStatus,
    WapPayParam,
};

// Transport
pub use crate::transport::{Transport, TransportResponse};
