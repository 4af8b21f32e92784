//! Precreate command - create a trade and render its QR code

use std::path::Path;

use alipay_lib::prelude::*;
use anyhow::Result;

use crate::ui;
use crate::OrderArgs;

#[tracing::instrument(skip(config))]
pub async fn run(config: Option<&Path>, order: &OrderArgs, verbose: bool) -> Result<()> {
    ui::header("QR Code Payment");
    let client = super::load_client(config, verbose)?;

    let out_trade_no = order
        .out_trade_no
        .clone()
        .unwrap_or_else(super::new_out_trade_no);
    let param = PrecreateParam::new(&out_trade_no, &order.amount, &order.subject)
        .with_timeout_express(&order.timeout);

    let spinner = ui::spinner("Creating trade...");
    let result = client.precreate(&param, &EnvelopeOptions::new()).await;
    spinner.finish_and_clear();
    let reply = result?;

    super::print_status(reply.status_code, &reply.data.status);
    if !reply.data.status.is_success() {
        return Ok(());
    }

    ui::key_value("Order", &reply.data.out_trade_no);
    ui::key_value("QR", &reply.data.qr_code);
    ui::qr_code(&reply.data.qr_code)?;
    ui::separator();
    ui::info(&format!(
        "Scan with the Alipay app, then run: alipay-demo query {}",
        out_trade_no
    ));
    Ok(())
}
