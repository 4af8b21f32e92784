//! Query command - look up a trade

use std::path::Path;

use alipay_lib::prelude::*;
use anyhow::Result;
use colored::Colorize;

use crate::ui;
use crate::TradeRef;

#[tracing::instrument(skip(config))]
pub async fn run(config: Option<&Path>, trade: &TradeRef, verbose: bool) -> Result<()> {
    ui::header("Trade Query");
    let client = super::load_client(config, verbose)?;

    let spinner = ui::spinner("Querying gateway...");
    let result = client
        .query(&trade.query_param(), &EnvelopeOptions::new())
        .await;
    spinner.finish_and_clear();
    let reply = result?;

    super::print_status(reply.status_code, &reply.data.status);
    let data = &reply.data;
    if data.status.is_success() {
        let status = match &data.trade_status {
            s if s.is_paid() => s.to_string().green(),
            TradeStatus::WaitBuyerPay => data.trade_status.to_string().yellow(),
            other => other.to_string().red(),
        };
        println!("  {}: {}", "Status".cyan(), status);
        ui::key_value("Trade no", &data.trade_no);
        ui::key_value("Order", &data.out_trade_no);
        ui::key_value("Amount", &data.total_amount);
        if !data.buyer_logon_id.is_empty() {
            ui::key_value("Buyer", &data.buyer_logon_id);
        }
        if !data.send_pay_date.is_empty() {
            ui::key_value("Paid at", &data.send_pay_date);
        }
    } else if data.is_trade_not_exist() {
        ui::info(
            "The gateway has no trade with that number (unpaid trades appear once the buyer scans)",
        );
    }
    Ok(())
}
