//! Verify-notify command - check a notification body offline

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ui;

pub fn run(config: Option<&Path>, file: Option<&Path>, verbose: bool) -> Result<()> {
    ui::header("Verify Notification");
    let client = super::load_client(config, verbose)?;

    let body = read_body(file)?;
    match client.parse_notification(body.trim()) {
        Ok(notification) => {
            ui::success("Signature verified");
            ui::key_value("Type", &notification.notify_type);
            ui::key_value("Order", &notification.out_trade_no);
            ui::key_value("Status", notification.trade_status.as_str());
            ui::key_value("Amount", &notification.total_amount);
            if notification.is_refund() {
                ui::key_value("Refund", &notification.refund_fee);
            }
            if verbose {
                ui::separator();
                ui::json(&serde_json::to_value(&notification)?);
            }
            ui::info(&format!(
                "Reply '{}' to stop redelivery",
                alipay_lib::notify::NOTIFY_ACK
            ));
            Ok(())
        }
        Err(err) => {
            ui::error("Notification rejected; do not act on its contents");
            Err(err.into())
        }
    }
}

fn read_body(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read stdin")?;
            Ok(body)
        }
    }
}
