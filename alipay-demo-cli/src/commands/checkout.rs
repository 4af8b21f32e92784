//! Checkout command - build signed checkout URLs and app order strings

use std::path::Path;

use alipay_lib::prelude::*;
use anyhow::Result;

use crate::ui;
use crate::OrderArgs;

fn options(return_url: Option<String>) -> EnvelopeOptions {
    EnvelopeOptions {
        return_url,
        ..Default::default()
    }
}

fn order_no(order: &OrderArgs) -> String {
    order
        .out_trade_no
        .clone()
        .unwrap_or_else(super::new_out_trade_no)
}

pub fn page(
    config: Option<&Path>,
    order: &OrderArgs,
    return_url: Option<String>,
    verbose: bool,
) -> Result<()> {
    ui::header("Desktop Checkout");
    let client = super::load_client(config, verbose)?;

    let out_trade_no = order_no(order);
    let param = PagePayParam::new(&out_trade_no, &order.amount, &order.subject, &order.timeout);
    let url = client.page_pay_url(&param, &options(return_url))?;

    ui::key_value("Order", &out_trade_no);
    ui::separator();
    println!("{}", url);
    ui::separator();
    ui::info("Open the URL in a browser to pay");
    Ok(())
}

pub fn wap(
    config: Option<&Path>,
    order: &OrderArgs,
    return_url: Option<String>,
    verbose: bool,
) -> Result<()> {
    ui::header("Mobile Web Checkout");
    let client = super::load_client(config, verbose)?;

    let out_trade_no = order_no(order);
    let param = WapPayParam::new(&out_trade_no, &order.amount, &order.subject, &order.timeout);
    let url = client.wap_pay_url(&param, &options(return_url))?;

    ui::key_value("Order", &out_trade_no);
    ui::separator();
    println!("{}", url);
    ui::separator();
    ui::qr_code(&url)?;
    ui::info("Scan with a phone to open the checkout page");
    Ok(())
}

pub fn app(config: Option<&Path>, order: &OrderArgs, verbose: bool) -> Result<()> {
    ui::header("App Checkout");
    let client = super::load_client(config, verbose)?;

    let out_trade_no = order_no(order);
    let param = AppPayParam::new(&out_trade_no, &order.amount, &order.subject, &order.timeout);
    let order_string = client.app_pay_order(&param, &EnvelopeOptions::new())?;

    ui::key_value("Order", &out_trade_no);
    ui::separator();
    println!("{}", order_string);
    ui::separator();
    ui::info("Pass the order string to the mobile SDK");
    Ok(())
}
