//! Refund commands - refund a trade and check a refund's outcome

use std::path::Path;

use alipay_lib::prelude::*;
use anyhow::Result;

use crate::ui;

#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip(config))]
pub async fn refund(
    config: Option<&Path>,
    out_trade_no: &str,
    amount: &str,
    request_no: Option<String>,
    reason: Option<String>,
    yes: bool,
    verbose: bool,
) -> Result<()> {
    ui::header("Refund");
    let client = super::load_client(config, verbose)?;

    let request_no = request_no
        .unwrap_or_else(|| format!("{}-{}", out_trade_no, super::new_out_trade_no()));
    ui::key_value("Order", out_trade_no);
    ui::key_value("Amount", amount);
    ui::key_value("Request no", &request_no);

    let prompt = format!("Refund {} on order {}?", amount, out_trade_no);
    if !yes && !ui::confirm(&prompt, false)? {
        ui::info("Refund cancelled");
        return Ok(());
    }

    let mut param = RefundParam::new(out_trade_no, amount).with_out_request_no(&request_no);
    param.refund_reason = reason;

    let spinner = ui::spinner("Sending refund...");
    let result = client.refund(&param, &EnvelopeOptions::new()).await;
    spinner.finish_and_clear();
    let reply = result?;

    super::print_status(reply.status_code, &reply.data.status);
    let data = &reply.data;
    if data.status.is_success() {
        ui::key_value("Refunded total", &data.refund_fee);
        ui::key_value("Funds moved", &data.fund_change);
    } else if data.is_not_enough_balance() {
        ui::warning("Merchant balance is too low for this refund");
    } else if data.is_trade_status_error() {
        ui::warning("The trade cannot be refunded in its current state");
    } else if data.is_not_equal_total() {
        ui::warning("This request number was already used with a different amount");
    } else {
        ui::info(&format!(
            "Outcome unclear; check with: alipay-demo refund-query {} --request-no {}",
            out_trade_no, request_no
        ));
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn query(
    config: Option<&Path>,
    out_trade_no: &str,
    request_no: Option<String>,
    verbose: bool,
) -> Result<()> {
    ui::header("Refund Query");
    let client = super::load_client(config, verbose)?;

    let request_no = request_no.unwrap_or_else(|| out_trade_no.to_string());
    let param = FastpayRefundQueryParam::new(out_trade_no, &request_no);

    let spinner = ui::spinner("Querying refund...");
    let result = client
        .fastpay_refund_query(&param, &EnvelopeOptions::new())
        .await;
    spinner.finish_and_clear();
    let reply = result?;

    super::print_status(reply.status_code, &reply.data.status);
    let data = &reply.data;
    if data.is_refund_success() {
        ui::success(&format!("Refunded {} of {}", data.refund_amount, data.total_amount));
    } else if data.is_need_retry() {
        ui::warning(&format!(
            "No refund recorded yet; resend the refund with request number {}",
            request_no
        ));
    } else if data.is_trade_not_exist() {
        ui::error("No such trade");
    }
    Ok(())
}
