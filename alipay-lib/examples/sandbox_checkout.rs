//! Sandbox checkout walkthrough
//!
//! Builds a desktop checkout URL, precreates a QR-code trade and queries it
//! back. Configure with:
//!
//! ```text
//! ALIPAY_APP_ID=...                 sandbox application id
//! ALIPAY_PRIVATE_KEY_PATH=...       merchant private key (PEM)
//! ALIPAY_PUBLIC_KEY_PATH=...        sandbox gateway public key (PEM)
//! ALIPAY_GATEWAY_URL=https://openapi-sandbox.dl.alipaydev.com/gateway.do
//! ```
//!
//! Run with: `cargo run -p alipay-lib --example sandbox_checkout`

use alipay_lib::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env().ok_or_else(|| {
        AlipayError::Configuration("set ALIPAY_APP_ID and the ALIPAY_*_KEY_PATH variables".into())
    })?;
    let client = AlipayClient::from_config(config)?;
    let out_trade_no = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();

    // Browser checkout: nothing is sent, the URL is signed locally.
    let page = PagePayParam::new(&out_trade_no, "0.01", "Sandbox order", "15m");
    let options = EnvelopeOptions::new().with_return_url("https://merchant.example/return");
    println!("Checkout URL:\n{}\n", client.page_pay_url(&page, &options)?);

    // QR-code checkout: the gateway creates the trade and returns a code.
    let precreate = PrecreateParam::new(format!("{}-qr", out_trade_no), "0.01", "Sandbox QR order");
    let reply = client.precreate(&precreate, &EnvelopeOptions::new()).await?;
    if !reply.data.status.is_success() {
        println!(
            "Precreate refused: {} {} ({})",
            reply.data.status.code, reply.data.status.msg, reply.data.status.sub_msg
        );
        return Ok(());
    }
    println!("QR code: {}", reply.data.qr_code);

    let query = QueryParam::by_out_trade_no(&reply.data.out_trade_no);
    let reply = client.query(&query, &EnvelopeOptions::new()).await?;
    println!(
        "Trade {}: {} (paid: {})",
        reply.data.out_trade_no,
        reply.data.trade_status,
        reply.data.trade_status.is_paid()
    );
    Ok(())
}
