//! The gateway client.
//!
//! [`AlipayClient`] ties the pieces together: it builds and signs the
//! envelope, sends it over its [`Transport`], and hands back only responses
//! that passed verification.
//!
//! The client holds no per-call state. Credentials are read-only and the
//! transport is shared, so one instance can serve concurrent calls.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::canonical::Params;
use crate::config::GatewayConfig;
use crate::crypto::Credentials;
use crate::envelope::{build_request, EnvelopeOptions, SignedRequest};
use crate::notify::{self, Notification};
use crate::response::GatewayResponse;
use crate::trade::{
    AppPayParam, BillDownloadUrlQueryParam, BillDownloadUrlQueryResponse, CancelParam,
    CancelResponse, CheckoutParam, CloseParam, CloseResponse, CreateParam, CreateResponse,
    FastpayRefundQueryParam, FastpayRefundQueryResponse, Method, OrderSettleParam,
    OrderSettleResponse, PagePayParam, PayParam, PayResponse, PrecreateParam, PrecreateResponse,
    QueryParam, QueryResponse, RefundParam, RefundResponse, Reply, WapPayParam,
};
use crate::transport::{HttpTransport, Transport};
use crate::{AlipayError, Result};

/// Client for one merchant application.
pub struct AlipayClient {
    config: GatewayConfig,
    credentials: Credentials,
    transport: Box<dyn Transport>,
}

impl AlipayClient {
    /// Create a client using the default HTTP transport.
    pub fn new(config: GatewayConfig, credentials: Credentials) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout_secs)?;
        Ok(Self::with_transport(config, credentials, Box::new(transport)))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(
        config: GatewayConfig,
        credentials: Credentials,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            config,
            credentials,
            transport,
        }
    }

    /// Create a client, loading both keys from the paths in `config`.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let private_key_path = config.private_key_path.as_deref().ok_or_else(|| {
            AlipayError::Configuration("private_key_path is not set".into())
        })?;
        let public_key_path = config.gateway_public_key_path.as_deref().ok_or_else(|| {
            AlipayError::Configuration("gateway_public_key_path is not set".into())
        })?;
        let credentials =
            Credentials::from_files(config.app_id.clone(), private_key_path, public_key_path)?;
        Self::new(config, credentials)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the signed request for `method` without sending it.
    pub fn signed_request<P: Serialize + ?Sized>(
        &self,
        method: &str,
        payload: &P,
        options: &EnvelopeOptions,
    ) -> Result<SignedRequest> {
        build_request(&self.credentials, method, payload, options)
    }

    /// The signed, form-URL-encoded query string for `method`.
    pub fn signed_query<P: Serialize + ?Sized>(
        &self,
        method: &str,
        payload: &P,
        options: &EnvelopeOptions,
    ) -> Result<String> {
        Ok(self.signed_request(method, payload, options)?.query)
    }

    /// Sign, send and verify one call.
    ///
    /// Returns the verified response; decoding the fragment is up to the
    /// caller. Nothing is retried.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, payload, options), err(Display))
    )]
    pub async fn execute<P: Serialize + ?Sized + Sync>(
        &self,
        method: &str,
        payload: &P,
        options: &EnvelopeOptions,
    ) -> Result<GatewayResponse> {
        let request = self.signed_request(method, payload, options)?;
        let url = self.request_url(&request.query);

        let response = self.transport.get(&url).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(method, status = response.status, "gateway responded");

        GatewayResponse::from_body(response.status, &response.body, self.credentials.verifier())
    }

    /// Call any gateway method and decode its verified fragment into `R`.
    pub async fn call<P, R>(
        &self,
        method: &str,
        payload: &P,
        options: &EnvelopeOptions,
    ) -> Result<Reply<R>>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self.execute(method, payload, options).await?;
        Ok(Reply::new(response.status_code(), response.decode()?))
    }

    /// Barcode / sound-wave payment.
    pub async fn pay(
        &self,
        param: &PayParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<PayResponse>> {
        let options = self.with_default_notify(options);
        self.call(Method::TradePay.as_str(), param, &options).await
    }

    pub async fn query(
        &self,
        param: &QueryParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<QueryResponse>> {
        self.call(Method::TradeQuery.as_str(), param, options).await
    }

    pub async fn refund(
        &self,
        param: &RefundParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<RefundResponse>> {
        self.call(Method::TradeRefund.as_str(), param, options).await
    }

    pub async fn fastpay_refund_query(
        &self,
        param: &FastpayRefundQueryParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<FastpayRefundQueryResponse>> {
        self.call(Method::TradeFastpayRefundQuery.as_str(), param, options)
            .await
    }

    pub async fn close(
        &self,
        param: &CloseParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<CloseResponse>> {
        self.call(Method::TradeClose.as_str(), param, options).await
    }

    pub async fn cancel(
        &self,
        param: &CancelParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<CancelResponse>> {
        self.call(Method::TradeCancel.as_str(), param, options).await
    }

    pub async fn create(
        &self,
        param: &CreateParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<CreateResponse>> {
        let options = self.with_default_notify(options);
        self.call(Method::TradeCreate.as_str(), param, &options).await
    }

    /// Create a trade and get a QR code for the buyer to scan.
    pub async fn precreate(
        &self,
        param: &PrecreateParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<PrecreateResponse>> {
        let options = self.with_default_notify(options);
        self.call(Method::TradePrecreate.as_str(), param, &options)
            .await
    }

    pub async fn order_settle(
        &self,
        param: &OrderSettleParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<OrderSettleResponse>> {
        self.call(Method::TradeOrderSettle.as_str(), param, options)
            .await
    }

    pub async fn bill_download_url_query(
        &self,
        param: &BillDownloadUrlQueryParam,
        options: &EnvelopeOptions,
    ) -> Result<Reply<BillDownloadUrlQueryResponse>> {
        self.call(Method::BillDownloadUrlQuery.as_str(), param, options)
            .await
    }

    /// Gateway URL to redirect a desktop browser to.
    pub fn page_pay_url(&self, param: &PagePayParam, options: &EnvelopeOptions) -> Result<String> {
        let query = self.checkout_query(param, options)?;
        Ok(self.request_url(&query))
    }

    /// Gateway URL to redirect a mobile browser to.
    pub fn wap_pay_url(&self, param: &WapPayParam, options: &EnvelopeOptions) -> Result<String> {
        let query = self.checkout_query(param, options)?;
        Ok(self.request_url(&query))
    }

    /// Order string to pass to the mobile SDK.
    pub fn app_pay_order(&self, param: &AppPayParam, options: &EnvelopeOptions) -> Result<String> {
        self.checkout_query(param, options)
    }

    /// Verify an inbound notification's signature.
    pub fn verify_notification(&self, params: &Params) -> Result<()> {
        notify::verify_notification(self.credentials.verifier(), params).map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(notify_id = params.get("notify_id"), "notification rejected");
            err
        })
    }

    /// Verify and decode a form-encoded notification body.
    pub fn parse_notification(&self, form_body: &str) -> Result<Notification> {
        self.parse_notification_params(&Params::from_form(form_body))
    }

    /// Verify and decode already-decoded notification fields.
    pub fn parse_notification_params(&self, params: &Params) -> Result<Notification> {
        self.verify_notification(params)?;
        Ok(Notification::from_verified_params(params))
    }

    fn checkout_query<P: CheckoutParam>(
        &self,
        param: &P,
        options: &EnvelopeOptions,
    ) -> Result<String> {
        let param = param.prepared()?;
        let options = self.with_default_notify(options);
        self.signed_query(P::METHOD.as_str(), &param, &options)
    }

    fn with_default_notify(&self, options: &EnvelopeOptions) -> EnvelopeOptions {
        let mut options = options.clone();
        if options.notify_url.is_none() {
            options.notify_url = self.config.notify_url.clone();
        }
        options
    }

    fn request_url(&self, query: &str) -> String {
        let separator = if self.config.gateway_url.contains('?') {
            '&'
        } else {
            '?'
        };
        format!("{}{}{}", self.config.gateway_url, separator, query)
    }
}

impl std::fmt::Debug for AlipayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlipayClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::test_utils::fixtures::{
        self, sign_notification, signed_response_body, test_credentials,
    };
    use crate::transport::TransportResponse;
    use crate::trade::TradeStatus;
    use crate::AlipayErrorCode;

    /// Replays one canned body and records the requested URLs.
    struct CannedTransport {
        status: u16,
        body: String,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn get(&self, url: &str) -> Result<TransportResponse> {
            self.seen.lock().unwrap().push(url.to_string());
            Ok(TransportResponse {
                status: self.status,
                body: self.body.clone().into_bytes(),
            })
        }
    }

    fn client_with(body: String) -> (AlipayClient, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let transport = CannedTransport {
            status: 200,
            body,
            seen: seen.clone(),
        };
        let config = GatewayConfig::sandbox(fixtures::TEST_APP_ID)
            .with_notify_url("https://merchant.example/notify");
        (
            AlipayClient::with_transport(config, test_credentials(), Box::new(transport)),
            seen,
        )
    }

    #[tokio::test]
    async fn test_query_decodes_verified_reply() {
        let fragment = r#"{"code":"10000","msg":"Success","trade_no":"2024","out_trade_no":"T1","trade_status":"TRADE_SUCCESS","total_amount":"9.90"}"#;
        let (client, seen) =
            client_with(signed_response_body("alipay_trade_query_response", fragment));

        let reply = client
            .query(&QueryParam::by_out_trade_no("T1"), &EnvelopeOptions::new())
            .await
            .unwrap();
        assert_eq!(reply.status_code, 200);
        assert_eq!(reply.data.trade_status, TradeStatus::TradeSuccess);

        let urls = seen.lock().unwrap();
        assert_eq!(urls.len(), 1);
        let (base, query) = urls[0].split_once('?').unwrap();
        assert_eq!(base, crate::config::SANDBOX_GATEWAY);
        let params = Params::from_form(query);
        assert_eq!(params.get("method"), Some("alipay.trade.query"));
        // Only operations that take a notification get the default URL.
        assert!(!params.contains_key("notify_url"));
    }

    #[tokio::test]
    async fn test_forged_reply_is_rejected() {
        let body = r#"{"alipay_trade_pay_response":{"code":"10000"},"sign":"Zm9yZ2Vk"}"#;
        let (client, _) = client_with(body.to_string());
        let err = client
            .pay(&PayParam::bar_code("T1", "28", "Coffee", "1.00"), &EnvelopeOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), AlipayErrorCode::Verification);
    }

    #[tokio::test]
    async fn test_pay_uses_default_notify_url() {
        let fragment = r#"{"code":"10000","msg":"Success","trade_no":"2024","out_trade_no":"T1"}"#;
        let (client, seen) =
            client_with(signed_response_body("alipay_trade_pay_response", fragment));
        client
            .pay(&PayParam::bar_code("T1", "28", "Coffee", "1.00"), &EnvelopeOptions::new())
            .await
            .unwrap();

        let url = seen.lock().unwrap()[0].clone();
        let params = Params::from_form(url.split_once('?').unwrap().1);
        assert_eq!(params.get("notify_url"), Some("https://merchant.example/notify"));
    }

    #[test]
    fn test_page_pay_url_is_signed() {
        let (client, seen) = client_with(String::new());
        let url = client
            .page_pay_url(
                &PagePayParam::new("T1", "10.00", "Keyboard", "15m"),
                &EnvelopeOptions::new().with_return_url("https://merchant.example/done"),
            )
            .unwrap();
        assert!(seen.lock().unwrap().is_empty());

        let (base, query) = url.split_once('?').unwrap();
        assert_eq!(base, crate::config::SANDBOX_GATEWAY);
        let mut params = Params::from_form(query);
        assert_eq!(params.get("method"), Some("alipay.trade.page.pay"));
        assert_eq!(params.get("return_url"), Some("https://merchant.example/done"));
        assert!(params.get("biz_content").unwrap().contains("FAST_INSTANT_TRADE_PAY"));

        let sign = params.remove("sign").unwrap().remove(0);
        fixtures::app_verifier()
            .verify_base64(params.canonical_string().as_bytes(), &sign)
            .unwrap();
    }

    #[test]
    fn test_checkout_validation() {
        let (client, _) = client_with(String::new());
        let err = client
            .wap_pay_url(&WapPayParam::new("T1", "1.00", "Tea", ""), &EnvelopeOptions::new())
            .unwrap_err();
        assert_eq!(err.code(), AlipayErrorCode::InvalidData);

        let order = client
            .app_pay_order(&AppPayParam::new("T1", "1.00", "Tea", "30m"), &EnvelopeOptions::new())
            .unwrap();
        assert!(!order.contains("gateway.do"));
        assert!(Params::from_form(&order)
            .get("biz_content")
            .unwrap()
            .contains("QUICK_MSECURITY_PAY"));
    }

    #[test]
    fn test_parse_notification() {
        let (client, _) = client_with(String::new());
        let params = sign_notification(
            vec![
                ("app_id", fixtures::TEST_APP_ID),
                ("out_trade_no", "T1"),
                ("trade_status", "TRADE_FINISHED"),
                ("total_amount", "1.00"),
            ]
            .into_iter()
            .collect(),
        );

        let notification = client.parse_notification(&params.to_query_string()).unwrap();
        assert_eq!(notification.trade_status, TradeStatus::TradeFinished);

        let mut forged = params.clone();
        forged.set("total_amount", "100.00");
        assert!(client.parse_notification_params(&forged).unwrap_err().is_verification());
    }

    #[test]
    fn test_from_config_requires_key_paths() {
        let err = AlipayClient::from_config(GatewayConfig::sandbox("app")).unwrap_err();
        assert_eq!(err.code(), AlipayErrorCode::Configuration);
    }

    #[test]
    fn test_from_config_loads_keys() {
        let dir = tempfile::tempdir().unwrap();
        let private = dir.path().join("app.pem");
        let public = dir.path().join("alipay.pem");
        std::fs::write(&private, fixtures::APP_PRIVATE_KEY).unwrap();
        std::fs::write(&public, fixtures::GATEWAY_PUBLIC_KEY).unwrap();

        let config = GatewayConfig::sandbox(fixtures::TEST_APP_ID).with_key_paths(
            private.to_string_lossy(),
            public.to_string_lossy(),
        );
        let client = AlipayClient::from_config(config).unwrap();
        assert_eq!(client.credentials().app_id(), fixtures::TEST_APP_ID);
    }

    #[test]
    fn test_request_url_with_existing_query() {
        let config = GatewayConfig::new("app", "http://localhost/gateway.do?charset=utf-8");
        let client = AlipayClient::with_transport(
            config,
            test_credentials(),
            Box::new(HttpTransport::new(1).unwrap()),
        );
        assert_eq!(
            client.request_url("a=1"),
            "http://localhost/gateway.do?charset=utf-8&a=1"
        );
    }
}
