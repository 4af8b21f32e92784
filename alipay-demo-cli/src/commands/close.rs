//! Close and cancel commands

use std::path::Path;

use alipay_lib::prelude::*;
use anyhow::Result;

use crate::ui;
use crate::TradeRef;

pub async fn close(config: Option<&Path>, trade: &TradeRef, verbose: bool) -> Result<()> {
    ui::header("Close Trade");
    let client = super::load_client(config, verbose)?;

    let spinner = ui::spinner("Closing trade...");
    let result = client
        .close(&trade.close_param(), &EnvelopeOptions::new())
        .await;
    spinner.finish_and_clear();
    let reply = result?;

    super::print_status(reply.status_code, &reply.data.status);
    if reply.data.status.is_success() {
        ui::key_value("Order", &reply.data.out_trade_no);
    }
    Ok(())
}

pub async fn cancel(config: Option<&Path>, trade: &TradeRef, verbose: bool) -> Result<()> {
    ui::header("Cancel Trade");
    let client = super::load_client(config, verbose)?;

    let spinner = ui::spinner("Cancelling trade...");
    let result = client
        .cancel(&trade.cancel_param(), &EnvelopeOptions::new())
        .await;
    spinner.finish_and_clear();
    let reply = result?;

    super::print_status(reply.status_code, &reply.data.status);
    let data = &reply.data;
    if !data.action.is_empty() {
        ui::key_value("Action", &data.action);
    }
    if data.needs_retry() {
        ui::warning("The gateway asks for the cancel to be sent again");
    }
    Ok(())
}
