//! CLI command implementations

use std::path::Path;

use alipay_lib::prelude::*;
use anyhow::Context;

use crate::ui;
use crate::TradeRef;

pub mod checkout;
pub mod close;
pub mod precreate;
pub mod query;
pub mod refund;
pub mod verify_notify;

/// Load the gateway configuration from `path`, or from the environment.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GatewayConfig> {
    match path {
        Some(path) => GatewayConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => GatewayConfig::from_env().ok_or_else(|| {
            anyhow::anyhow!(
                "No configuration found. Pass --config <file> or set ALIPAY_APP_ID, \
                 ALIPAY_PRIVATE_KEY_PATH and ALIPAY_PUBLIC_KEY_PATH."
            )
        }),
    }
}

/// Build a client with keys loaded from the configured paths.
pub fn load_client(path: Option<&Path>, verbose: bool) -> anyhow::Result<AlipayClient> {
    let config = load_config(path)?;
    if verbose {
        ui::key_value("App ID", &config.app_id);
        ui::key_value("Gateway", &config.gateway_url);
    }
    if config.is_sandbox() {
        ui::info("Using the sandbox gateway");
    }
    tracing::debug!(app_id = %config.app_id, "loading credentials");
    AlipayClient::from_config(config).context("Failed to load credentials")
}

/// Merchant order number derived from the current time.
pub fn new_out_trade_no() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S%3f").to_string()
}

/// Print the shared status block of a gateway reply.
pub fn print_status(status_code: u16, status: &ResponseStatus) {
    ui::key_value("HTTP", &status_code.to_string());
    ui::key_value("Code", &format!("{} {}", status.code, status.msg));
    if let Some(sub_code) = status.sub_code() {
        ui::key_value("Sub-code", &format!("{} {}", sub_code, status.sub_msg));
    }
    if status.is_success() {
        ui::success("Gateway accepted the call");
    } else {
        ui::warning("Gateway reported a business failure");
    }
}

impl TradeRef {
    pub fn query_param(&self) -> QueryParam {
        QueryParam {
            out_trade_no: self.out_trade_no.clone(),
            trade_no: self.trade_no.clone(),
        }
    }

    pub fn close_param(&self) -> CloseParam {
        CloseParam {
            out_trade_no: self.out_trade_no.clone(),
            trade_no: self.trade_no.clone(),
            operator_id: None,
        }
    }

    pub fn cancel_param(&self) -> CancelParam {
        CancelParam {
            out_trade_no: self.out_trade_no.clone(),
            trade_no: self.trade_no.clone(),
        }
    }
}
