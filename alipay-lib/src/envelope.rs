//! Request envelope: the protocol fields wrapped around every business
//! payload, and the signed query string built from them.

use chrono::Local;
use serde::Serialize;

use crate::canonical::{Params, SIGN_FIELD};
use crate::crypto::Credentials;
use crate::Result;

/// Only supported response format.
pub const FORMAT_JSON: &str = "JSON";
/// Request charset.
pub const CHARSET_UTF8: &str = "utf-8";
/// Default signature algorithm: RSA PKCS#1 v1.5 over SHA-256.
pub const SIGN_TYPE_RSA2: &str = "RSA2";
/// Protocol version.
pub const API_VERSION: &str = "1.0";
/// `timestamp` field layout, `yyyy-MM-dd HH:mm:ss`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Optional envelope fields a caller may set per request.
///
/// Everything defaults to absent; absent fields are left out of both the
/// signature and the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvelopeOptions {
    /// Server-to-server notification URL (`notify_url`).
    pub notify_url: Option<String>,
    /// Browser return URL after checkout (`return_url`).
    pub return_url: Option<String>,
    /// Third-party application authorization token (`app_auth_token`).
    pub app_auth_token: Option<String>,
    /// Overrides the advertised `sign_type`. The signature itself is always RSA2.
    pub sign_type: Option<String>,
}

impl EnvelopeOptions {
    /// Options with every field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the notification URL.
    pub fn with_notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    /// Set the return URL.
    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// Set the app authorization token.
    pub fn with_app_auth_token(mut self, token: impl Into<String>) -> Self {
        self.app_auth_token = Some(token.into());
        self
    }

    /// Override the advertised sign type.
    pub fn with_sign_type(mut self, sign_type: impl Into<String>) -> Self {
        self.sign_type = Some(sign_type.into());
        self
    }
}

/// Protocol fields for one call, before signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub app_id: String,
    pub method: String,
    pub format: String,
    pub charset: String,
    pub sign_type: String,
    pub timestamp: String,
    pub version: String,
    pub notify_url: Option<String>,
    pub return_url: Option<String>,
    pub app_auth_token: Option<String>,
    pub biz_content: String,
}

impl Envelope {
    /// Envelope with protocol defaults and the given overrides applied.
    pub fn new(
        app_id: &str,
        method: &str,
        biz_content: String,
        timestamp: String,
        options: &EnvelopeOptions,
    ) -> Self {
        Self {
            app_id: app_id.to_string(),
            method: method.to_string(),
            format: FORMAT_JSON.to_string(),
            charset: CHARSET_UTF8.to_string(),
            sign_type: options
                .sign_type
                .clone()
                .unwrap_or_else(|| SIGN_TYPE_RSA2.to_string()),
            timestamp,
            version: API_VERSION.to_string(),
            notify_url: options.notify_url.clone(),
            return_url: options.return_url.clone(),
            app_auth_token: options.app_auth_token.clone(),
            biz_content,
        }
    }

    /// Field set as sent on the wire, without `sign`.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.set("app_id", &self.app_id);
        params.set("method", &self.method);
        params.set("format", &self.format);
        params.set("charset", &self.charset);
        params.set("sign_type", &self.sign_type);
        params.set("timestamp", &self.timestamp);
        params.set("version", &self.version);
        params.set_opt("notify_url", self.notify_url.as_deref());
        params.set_opt("return_url", self.return_url.as_deref());
        params.set_opt("app_auth_token", self.app_auth_token.as_deref());
        params.set("biz_content", &self.biz_content);
        params
    }
}

/// A fully signed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    /// Every field including `sign`, decoded.
    pub params: Params,
    /// Form-URL-encoded query string ready to append to the gateway URL.
    pub query: String,
}

impl SignedRequest {
    /// The signature attached to this request.
    pub fn sign(&self) -> &str {
        self.params.get(SIGN_FIELD).unwrap_or_default()
    }
}

/// Current local time in the gateway's timestamp layout.
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Build and sign a request for `method` with the current time.
pub fn build_request<P: Serialize + ?Sized>(
    credentials: &Credentials,
    method: &str,
    payload: &P,
    options: &EnvelopeOptions,
) -> Result<SignedRequest> {
    build_request_at(credentials, method, payload, options, current_timestamp())
}

/// Build and sign a request with an explicit `timestamp`.
///
/// The payload is serialized to compact JSON into `biz_content`, the
/// canonical string over every non-empty field is signed with the merchant
/// key, and `sign` is attached last. Nothing is returned unless signing
/// succeeded.
pub fn build_request_at<P: Serialize + ?Sized>(
    credentials: &Credentials,
    method: &str,
    payload: &P,
    options: &EnvelopeOptions,
    timestamp: String,
) -> Result<SignedRequest> {
    let biz_content = serde_json::to_string(payload)?;
    let envelope = Envelope::new(credentials.app_id(), method, biz_content, timestamp, options);

    let mut params = envelope.to_params();
    let sign = credentials
        .signer()
        .sign(params.canonical_string().as_bytes())?;
    params.set(SIGN_FIELD, sign);

    let query = params.to_query_string();
    Ok(SignedRequest { params, query })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test_utils::fixtures::{self, test_credentials};
    use crate::AlipayErrorCode;

    #[derive(Serialize)]
    struct Foo {
        foo: &'static str,
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope = Envelope::new(
            "app",
            "alipay.trade.query",
            "{}".into(),
            "2024-01-01 00:00:00".into(),
            &EnvelopeOptions::new(),
        );
        assert_eq!(envelope.format, "JSON");
        assert_eq!(envelope.charset, "utf-8");
        assert_eq!(envelope.sign_type, "RSA2");
        assert_eq!(envelope.version, "1.0");
        let params = envelope.to_params();
        assert!(!params.contains_key("notify_url"));
        assert!(!params.contains_key("return_url"));
        assert!(!params.contains_key("app_auth_token"));
        assert!(!params.contains_key("sign"));
    }

    #[test]
    fn test_overrides_are_applied() {
        let options = EnvelopeOptions::new()
            .with_notify_url("https://merchant.example/notify")
            .with_return_url("https://merchant.example/return")
            .with_app_auth_token("token-1")
            .with_sign_type("RSA");
        let request = build_request_at(
            &test_credentials(),
            "alipay.trade.pay",
            &Foo { foo: "bar" },
            &options,
            "2024-01-01 00:00:00".into(),
        )
        .unwrap();

        let params = &request.params;
        assert_eq!(params.get("notify_url"), Some("https://merchant.example/notify"));
        assert_eq!(params.get("return_url"), Some("https://merchant.example/return"));
        assert_eq!(params.get("app_auth_token"), Some("token-1"));
        assert_eq!(params.get("sign_type"), Some("RSA"));
    }

    #[test]
    fn test_signature_covers_everything_but_sign() {
        let request = build_request_at(
            &test_credentials(),
            "alipay.trade.pay",
            &Foo { foo: "bar" },
            &EnvelopeOptions::new().with_notify_url("https://merchant.example/notify"),
            "2024-01-01 00:00:00".into(),
        )
        .unwrap();

        // Strip the signature from the decoded query and re-canonicalize.
        let mut received = Params::from_form(&request.query);
        let sign = received.remove("sign").unwrap().remove(0);
        assert_eq!(sign, request.sign());
        fixtures::app_verifier()
            .verify_base64(received.canonical_string().as_bytes(), &sign)
            .unwrap();
    }

    #[test]
    fn test_biz_content_is_compact_json() {
        let mut payload = BTreeMap::new();
        payload.insert("out_trade_no", "20150320010101001");
        payload.insert("subject", "Iphone6 16G");
        let request = build_request_at(
            &test_credentials(),
            "alipay.trade.query",
            &payload,
            &EnvelopeOptions::new(),
            "2024-01-01 00:00:00".into(),
        )
        .unwrap();
        assert_eq!(
            request.params.get("biz_content"),
            Some(r#"{"out_trade_no":"20150320010101001","subject":"Iphone6 16G"}"#)
        );
        assert!(request.query.ends_with(&format!(
            "&sign={}",
            url::form_urlencoded::byte_serialize(request.sign().as_bytes()).collect::<String>()
        )));
    }

    #[test]
    fn test_unserializable_payload_is_serialization_error() {
        let mut payload = std::collections::HashMap::new();
        payload.insert(vec![1u8], "map keys must be strings");
        let err = build_request_at(
            &test_credentials(),
            "alipay.trade.pay",
            &payload,
            &EnvelopeOptions::new(),
            "2024-01-01 00:00:00".into(),
        )
        .unwrap_err();
        assert_eq!(err.code(), AlipayErrorCode::Serialization);
    }

    #[test]
    fn test_current_timestamp_layout() {
        let timestamp = current_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(timestamp.len(), 19);
    }
}
