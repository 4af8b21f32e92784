//! Refunds: `alipay.trade.refund` and `alipay.trade.fastpay.refund.query`.
//!
//! Neither operation retries. A refund whose outcome is unclear should be
//! re-queried (or re-sent) with the same `out_request_no` so the gateway
//! can match the attempts.

use serde::{Deserialize, Serialize};

use super::{is_positive_amount, is_zero_amount, GoodsDetail, ResponseStatus};

/// Parameters for [`AlipayClient::refund`](crate::AlipayClient::refund).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_trade_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
    pub refund_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,
    /// Idempotency key; required for partial refunds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_request_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goods_detail: Vec<GoodsDetail>,
}

impl RefundParam {
    /// Refund `refund_amount` of the trade with merchant order number `out_trade_no`.
    pub fn new(out_trade_no: impl Into<String>, refund_amount: impl Into<String>) -> Self {
        Self {
            out_trade_no: Some(out_trade_no.into()),
            refund_amount: refund_amount.into(),
            ..Default::default()
        }
    }

    pub fn with_out_request_no(mut self, out_request_no: impl Into<String>) -> Self {
        self.out_request_no = Some(out_request_no.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.refund_reason = Some(reason.into());
        self
    }
}

/// Funding channel a refund went back through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundDetailItem {
    pub fund_channel: String,
    pub bank_code: String,
    pub amount: String,
    pub real_amount: String,
    /// `DEBIT_CARD`, `CREDIT_CARD` or `MIXED_CARD` for bank card channels.
    pub fund_type: String,
}

/// Business fragment of `alipay_trade_refund_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub buyer_logon_id: String,
    /// `Y` when this call moved funds; `N` for a repeated request.
    #[serde(default)]
    pub fund_change: String,
    #[serde(default)]
    pub refund_fee: String,
    #[serde(default)]
    pub gmt_refund_pay: String,
    #[serde(default)]
    pub refund_detail_item_list: Vec<RefundDetailItem>,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub buyer_user_id: String,
    #[serde(default)]
    pub present_refund_buyer_amount: String,
    #[serde(default)]
    pub present_refund_discount_amount: String,
    #[serde(default)]
    pub present_refund_mdiscount_amount: String,
}

impl RefundResponse {
    /// The merchant balance cannot cover the refund.
    pub fn is_not_enough_balance(&self) -> bool {
        self.status.sub_code() == Some("ACQ.SELLER_BALANCE_NOT_ENOUGH")
    }

    /// The trade is in a state that cannot be refunded.
    pub fn is_trade_status_error(&self) -> bool {
        self.status.sub_code() == Some("ACQ.TRADE_STATUS_ERROR")
    }

    /// The refund amount does not match the original request for this `out_request_no`.
    pub fn is_not_equal_total(&self) -> bool {
        self.status.sub_code() == Some("ACQ.REFUND_AMT_NOT_EQUAL_TOTAL")
    }
}

/// Parameters for
/// [`AlipayClient::fastpay_refund_query`](crate::AlipayClient::fastpay_refund_query).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastpayRefundQueryParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_trade_no: Option<String>,
    /// Defaults to `out_trade_no` on the gateway when the refund was sent without one.
    pub out_request_no: String,
}

impl FastpayRefundQueryParam {
    pub fn new(out_trade_no: impl Into<String>, out_request_no: impl Into<String>) -> Self {
        Self {
            trade_no: None,
            out_trade_no: Some(out_trade_no.into()),
            out_request_no: out_request_no.into(),
        }
    }
}

/// Business fragment of `alipay_trade_fastpay_refund_query_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastpayRefundQueryResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub out_request_no: String,
    #[serde(default)]
    pub refund_reason: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub refund_amount: String,
}

impl FastpayRefundQueryResponse {
    /// The refund went through.
    pub fn is_refund_success(&self) -> bool {
        self.status.is_success() && is_positive_amount(&self.refund_amount)
    }

    /// The query succeeded but the refunded amount is absent or zero: resend
    /// the refund with the same `out_request_no`.
    pub fn is_need_retry(&self) -> bool {
        self.status.is_success() && is_zero_amount(&self.refund_amount)
    }

    /// The trade was not found.
    pub fn is_trade_not_exist(&self) -> bool {
        self.status.sub_code() == Some("ACQ.TRADE_NOT_EXIST")
    }
}
