//! Pre-created trades: `alipay.trade.create` (buyer known up front) and
//! `alipay.trade.precreate` (QR code scanned by the buyer).

use serde::{Deserialize, Serialize};

use super::{ExtendParams, GoodsDetail, ResponseStatus};

/// Parameters for [`AlipayClient::create`](crate::AlipayClient::create).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateParam {
    pub out_trade_no: String,
    pub total_amount: String,
    pub subject: String,
    /// Buyer's user id; required by the gateway for this method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discountable_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goods_detail: Vec<GoodsDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_params: Option<ExtendParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_express: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_params: Option<String>,
}

impl CreateParam {
    pub fn new(
        out_trade_no: impl Into<String>,
        total_amount: impl Into<String>,
        subject: impl Into<String>,
        buyer_id: impl Into<String>,
    ) -> Self {
        Self {
            out_trade_no: out_trade_no.into(),
            total_amount: total_amount.into(),
            subject: subject.into(),
            buyer_id: Some(buyer_id.into()),
            ..Default::default()
        }
    }
}

/// Business fragment of `alipay_trade_create_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub trade_no: String,
}

/// Parameters for [`AlipayClient::precreate`](crate::AlipayClient::precreate).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecreateParam {
    pub out_trade_no: String,
    pub total_amount: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discountable_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goods_detail: Vec<GoodsDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_pay_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_pay_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_params: Option<ExtendParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_express: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_params: Option<String>,
}

impl PrecreateParam {
    pub fn new(
        out_trade_no: impl Into<String>,
        total_amount: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            out_trade_no: out_trade_no.into(),
            total_amount: total_amount.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout_express(mut self, timeout: impl Into<String>) -> Self {
        self.timeout_express = Some(timeout.into());
        self
    }
}

/// Business fragment of `alipay_trade_precreate_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecreateResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub out_trade_no: String,
    /// Payment link to render as a QR code for the buyer to scan.
    #[serde(default)]
    pub qr_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precreate_param() {
        let param = PrecreateParam::new("T9", "0.01", "Snacks").with_timeout_express("5m");
        assert_eq!(
            serde_json::to_string(&param).unwrap(),
            r#"{"out_trade_no":"T9","total_amount":"0.01","subject":"Snacks","timeout_express":"5m"}"#
        );
    }

    #[test]
    fn test_precreate_response_qr_code() {
        let response: PrecreateResponse = serde_json::from_str(
            r#"{"code":"10000","msg":"Success","out_trade_no":"T9","qr_code":"https://qr.alipay.com/bax03431ljhokirwl38f00a7"}"#,
        )
        .unwrap();
        assert!(response.status.is_success());
        assert!(response.qr_code.starts_with("https://qr.alipay.com/"));
    }

    #[test]
    fn test_create_requires_buyer() {
        let param = CreateParam::new("T2", "1.00", "Book", "2088102146225135");
        let json: serde_json::Value = serde_json::to_value(&param).unwrap();
        assert_eq!(json["buyer_id"], "2088102146225135");
        assert!(json.get("goods_detail").is_none());
    }
}
