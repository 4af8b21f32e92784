//! Asynchronous notification (webhook) verification.
//!
//! The gateway POSTs a form-encoded body to the merchant's `notify_url`
//! whenever a trade changes state. Every field is untrusted until
//! [`verify_notification`] succeeds. Verification:
//!
//! 1. URL-decode the body (see [`Params::from_form`]).
//! 2. Drop `sign` and `sign_type`, canonicalize the rest.
//! 3. Base64-decode `sign` and check it against the gateway public key.
//!
//! The gateway redelivers until it receives `success`; the verifier has no
//! side effects, so handling redelivery idempotently is up to the caller.

use serde::{Deserialize, Serialize};

use crate::canonical::{canonicalize, Params, SIGN_FIELD, SIGN_TYPE_FIELD};
use crate::crypto::Verifier;
use crate::envelope::SIGN_TYPE_RSA2;
use crate::trade::TradeStatus;
use crate::{AlipayError, Result};

/// Body the merchant must answer with once a notification is processed.
pub const NOTIFY_ACK: &str = "success";

const REJECTED: &str = "notification rejected";

/// Check a notification's signature.
///
/// Every failure (missing or undecodable `sign`, unexpected `sign_type`,
/// signature mismatch) produces the same [`AlipayError::Verification`].
pub fn verify_notification(verifier: &Verifier, params: &Params) -> Result<()> {
    let rejected = || AlipayError::Verification(REJECTED.to_string());

    if params.get(SIGN_TYPE_FIELD) != Some(SIGN_TYPE_RSA2) {
        return Err(rejected());
    }
    let sign = params.get(SIGN_FIELD).ok_or_else(rejected)?;

    let canonical = canonicalize(
        params
            .iter()
            .filter(|(key, _)| *key != SIGN_FIELD && *key != SIGN_TYPE_FIELD),
    );
    verifier
        .verify_base64(canonical.as_bytes(), sign)
        .map_err(|_| rejected())
}

/// A verified trade notification.
///
/// [`Notification::verified`] and the client helpers built on it only return
/// one after the gateway signature checked out. The type itself carries no
/// proof: fields are public and it can be deserialized or built by hand, so
/// only trust values that came from those constructors.
/// Amounts are decimal strings exactly as sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub notify_time: String,
    pub notify_type: String,
    pub notify_id: String,
    pub app_id: String,
    pub charset: String,
    pub version: String,
    pub sign_type: String,
    pub auth_app_id: String,
    pub trade_no: String,
    pub out_trade_no: String,
    pub out_biz_no: String,
    pub buyer_id: String,
    pub buyer_logon_id: String,
    pub seller_id: String,
    pub seller_email: String,
    pub trade_status: TradeStatus,
    pub total_amount: String,
    pub receipt_amount: String,
    pub invoice_amount: String,
    pub buyer_pay_amount: String,
    pub point_amount: String,
    pub refund_fee: String,
    pub subject: String,
    pub body: String,
    pub gmt_create: String,
    pub gmt_payment: String,
    pub gmt_refund: String,
    pub gmt_close: String,
    /// JSON array describing the funding channels, as sent.
    pub fund_bill_list: String,
    pub passback_params: String,
    /// JSON array describing vouchers used, as sent.
    pub voucher_detail_list: String,
}

impl Notification {
    /// Verify `params` and decode them.
    pub fn verified(verifier: &Verifier, params: &Params) -> Result<Self> {
        verify_notification(verifier, params)?;
        Ok(Self::from_verified_params(params))
    }

    /// Verify a raw form body and decode it.
    pub fn verified_form(verifier: &Verifier, body: &str) -> Result<Self> {
        Self::verified(verifier, &Params::from_form(body))
    }

    pub(crate) fn from_verified_params(params: &Params) -> Self {
        let field = |name: &str| params.get(name).unwrap_or_default().to_string();
        Self {
            notify_time: field("notify_time"),
            notify_type: field("notify_type"),
            notify_id: field("notify_id"),
            app_id: field("app_id"),
            charset: field("charset"),
            version: field("version"),
            sign_type: field("sign_type"),
            auth_app_id: field("auth_app_id"),
            trade_no: field("trade_no"),
            out_trade_no: field("out_trade_no"),
            out_biz_no: field("out_biz_no"),
            buyer_id: field("buyer_id"),
            buyer_logon_id: field("buyer_logon_id"),
            seller_id: field("seller_id"),
            seller_email: field("seller_email"),
            trade_status: TradeStatus::from(field("trade_status")),
            total_amount: field("total_amount"),
            receipt_amount: field("receipt_amount"),
            invoice_amount: field("invoice_amount"),
            buyer_pay_amount: field("buyer_pay_amount"),
            point_amount: field("point_amount"),
            refund_fee: field("refund_fee"),
            subject: field("subject"),
            body: field("body"),
            gmt_create: field("gmt_create"),
            gmt_payment: field("gmt_payment"),
            gmt_refund: field("gmt_refund"),
            gmt_close: field("gmt_close"),
            fund_bill_list: field("fund_bill_list"),
            passback_params: field("passback_params"),
            voucher_detail_list: field("voucher_detail_list"),
        }
    }

    /// Whether this notification reports a refund (partial or full).
    pub fn is_refund(&self) -> bool {
        !self.out_biz_no.is_empty() || !self.refund_fee.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{self, sign_notification};

    fn verifier() -> Verifier {
        Verifier::from_pem(fixtures::GATEWAY_PUBLIC_KEY).unwrap()
    }

    fn notification() -> Params {
        let params: Params = vec![
            ("notify_time", "2024-01-01 12:00:05"),
            ("notify_type", "trade_status_sync"),
            ("notify_id", "ac05099524730693a8b330c5ecf72da9786"),
            ("app_id", fixtures::TEST_APP_ID),
            ("charset", "utf-8"),
            ("version", "1.0"),
            ("trade_no", "2013112011001004330000121536"),
            ("out_trade_no", "6823789339978248"),
            ("trade_status", "TRADE_SUCCESS"),
            ("total_amount", "20.00"),
            ("subject", "当面付测试"),
            ("gmt_payment", "2024-01-01 12:00:04"),
            ("fund_bill_list", r#"[{"amount":"20.00","fundChannel":"ALIPAYACCOUNT"}]"#),
        ]
        .into_iter()
        .collect();
        sign_notification(params)
    }

    #[test]
    fn test_valid_notification_is_accepted() {
        let params = notification();
        verify_notification(&verifier(), &params).unwrap();

        let decoded = Notification::verified(&verifier(), &params).unwrap();
        assert_eq!(decoded.trade_status, TradeStatus::TradeSuccess);
        assert_eq!(decoded.out_trade_no, "6823789339978248");
        assert_eq!(decoded.subject, "当面付测试");
        assert_eq!(decoded.sign_type, "RSA2");
        assert!(!decoded.is_refund());
    }

    #[test]
    fn test_form_body_round_trip() {
        let body = notification().to_query_string();
        let decoded = Notification::verified_form(&verifier(), &body).unwrap();
        assert_eq!(decoded.total_amount, "20.00");
    }

    #[test]
    fn test_deserialized_copy_is_not_a_verification() {
        // A stored copy compares equal, but only `verified` checks the signature.
        let decoded = Notification::verified(&verifier(), &notification()).unwrap();
        let stored: Notification =
            serde_json::from_str(&serde_json::to_string(&decoded).unwrap()).unwrap();
        assert_eq!(stored, decoded);

        let mut forged = notification();
        forged.set("total_amount", "0.01");
        assert!(Notification::verified(&verifier(), &forged).is_err());
    }

    #[test]
    fn test_tampered_field_is_rejected() {
        let mut params = notification();
        params.set("total_amount", "0.01");
        assert!(verify_notification(&verifier(), &params).unwrap_err().is_verification());
    }

    #[test]
    fn test_added_field_is_rejected() {
        let mut params = notification();
        params.set("refund_fee", "20.00");
        assert!(verify_notification(&verifier(), &params).is_err());
    }

    #[test]
    fn test_tampered_sign_is_rejected() {
        let mut params = notification();
        let mut sign = params.get("sign").unwrap().to_string();
        sign.replace_range(0..4, "AAAA");
        params.set("sign", sign);
        assert!(verify_notification(&verifier(), &params).is_err());
    }

    #[test]
    fn test_tampered_sign_type_is_rejected() {
        let mut params = notification();
        params.set("sign_type", "RSA");
        assert!(verify_notification(&verifier(), &params).is_err());

        params.remove("sign_type");
        assert!(verify_notification(&verifier(), &params).is_err());
    }

    #[test]
    fn test_failures_are_indistinguishable() {
        let mut missing = notification();
        missing.remove("sign");

        let mut garbage = notification();
        garbage.set("sign", "%%%");

        let mut mismatch = notification();
        mismatch.set("subject", "changed");

        let messages: Vec<String> = [missing, garbage, mismatch]
            .iter()
            .map(|params| verify_notification(&verifier(), params).unwrap_err().to_string())
            .collect();
        assert!(messages.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_empty_values_do_not_break_verification() {
        let mut params = notification();
        // The gateway signs without empty fields; an empty one on the wire is ignored.
        params.set("passback_params", "");
        verify_notification(&verifier(), &params).unwrap();
    }

    #[test]
    fn test_refund_notification() {
        let mut params = notification();
        params.set("out_biz_no", "HZ01RF001");
        params.set("refund_fee", "12.00");
        params.set("gmt_refund", "2024-01-02 10:00:00.000");
        let decoded = Notification::verified(&verifier(), &sign_notification(params)).unwrap();
        assert!(decoded.is_refund());
        assert_eq!(decoded.refund_fee, "12.00");
    }
}
