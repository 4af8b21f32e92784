//! Verifying notification bodies as they arrive on the wire.

mod common;

use alipay_lib::notify::{verify_notification, NOTIFY_ACK};
use alipay_lib::prelude::*;

fn notification_fields() -> Params {
    vec![
        ("gmt_create", "2024-01-01 12:00:00"),
        ("charset", "utf-8"),
        ("seller_email", "merchant@example.com"),
        ("subject", "订单 #42 & more"),
        ("buyer_id", "2088102122524333"),
        ("invoice_amount", "88.88"),
        ("notify_id", "4a91b7a78a503640467525113fb7d8bg8e"),
        ("fund_bill_list", r#"[{"amount":"88.88","fundChannel":"ALIPAYACCOUNT"}]"#),
        ("notify_type", "trade_status_sync"),
        ("trade_status", "TRADE_SUCCESS"),
        ("receipt_amount", "88.88"),
        ("app_id", common::APP_ID),
        ("buyer_pay_amount", "88.88"),
        ("seller_id", "2088102119685838"),
        ("gmt_payment", "2024-01-01 12:00:04"),
        ("notify_time", "2024-01-01 12:00:05"),
        ("passback_params", "order%3D42"),
        ("version", "1.0"),
        ("out_trade_no", "6823789339978248"),
        ("total_amount", "88.88"),
        ("trade_no", "2013112011001004330000121536"),
        ("auth_app_id", common::APP_ID),
        ("buyer_logon_id", "159****5620"),
        ("point_amount", "0.00"),
    ]
    .into_iter()
    .collect()
}

fn client() -> AlipayClient {
    AlipayClient::new(GatewayConfig::sandbox(common::APP_ID), common::credentials()).unwrap()
}

#[test]
fn test_form_encoded_body_verifies() {
    let body = common::sign_notification(notification_fields()).to_query_string();
    // Spaces travel as '+', '&' and '#' percent-encoded.
    assert!(body.contains("gmt_create=2024-01-01+12%3A00%3A00"));

    let notification = client().parse_notification(&body).unwrap();
    assert_eq!(notification.trade_status, TradeStatus::TradeSuccess);
    assert_eq!(notification.subject, "订单 #42 & more");
    assert_eq!(notification.passback_params, "order%3D42");
    assert_eq!(notification.notify_type, "trade_status_sync");
    assert_eq!(NOTIFY_ACK, "success");
}

#[test]
fn test_signature_over_encoded_text_is_rejected() {
    // A signature computed over the still-encoded body must not verify.
    let fields = notification_fields();
    let encoded_canonical = fields
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                k,
                url::form_urlencoded::byte_serialize(v.as_bytes()).collect::<String>()
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    let sign = common::gateway_signer()
        .sign(encoded_canonical.as_bytes())
        .unwrap();

    let mut params = fields;
    params.set("sign_type", "RSA2");
    params.set("sign", sign);
    assert!(verify_notification(&common::gateway_verifier(), &params).is_err());
}

#[test]
fn test_tampering_is_rejected_with_one_message() {
    let signed = common::sign_notification(notification_fields());

    let mut amount = signed.clone();
    amount.set("total_amount", "0.01");

    let mut sign_type = signed.clone();
    sign_type.set("sign_type", "RSA");

    let mut sign = signed.clone();
    sign.set("sign", "not base64!");

    let mut dropped = signed.clone();
    dropped.remove("buyer_id");

    let messages: Vec<String> = [amount, sign_type, sign, dropped]
        .iter()
        .map(|params| {
            let err = client().parse_notification_params(params).unwrap_err();
            assert_eq!(err.code(), AlipayErrorCode::Verification);
            err.to_string()
        })
        .collect();
    assert!(messages.iter().all(|message| message == &messages[0]));
}

#[test]
fn test_redelivery_verifies_every_time() {
    let body = common::sign_notification(notification_fields()).to_query_string();
    let client = client();
    let first = client.parse_notification(&body).unwrap();
    let second = client.parse_notification(&body).unwrap();
    assert_eq!(first, second);
}
