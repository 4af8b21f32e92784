//! Typed trade operations.
//!
//! Each operation is a parameter struct serialized into `biz_content` and a
//! response struct decoded from the verified business fragment. Responses
//! embed the shared [`ResponseStatus`] as a named `status` field.
//!
//! Amounts are decimal strings passed through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

mod bill;
mod checkout;
mod close;
mod create;
mod pay;
mod query;
mod refund;
mod settle;

pub use crate::response::{ResponseStatus, GATEWAY_SUCCESS};
pub use bill::{
    BillDownloadUrlQueryParam, BillDownloadUrlQueryResponse, BILL_TYPE_SIGNCUSTOMER,
    BILL_TYPE_TRADE,
};
pub use checkout::{
    AppPayParam, CheckoutParam, PagePayParam, WapPayParam, PRODUCT_APP_PAY, PRODUCT_PAGE_PAY,
    PRODUCT_WAP_PAY,
};
pub use close::{CancelParam, CancelResponse, CloseParam, CloseResponse};
pub use create::{CreateParam, CreateResponse, PrecreateParam, PrecreateResponse};
pub use pay::{
    PayParam, PayResponse, VoucherDetail, PAY_WAITING_BUYER, SCENE_BAR_CODE, SCENE_WAVE_CODE,
};
pub use query::{QueryParam, QueryResponse};
pub use refund::{
    FastpayRefundQueryParam, FastpayRefundQueryResponse, RefundDetailItem, RefundParam,
    RefundResponse,
};
pub use settle::{OrderSettleParam, OrderSettleResponse, RoyaltyDetail};

/// Gateway method identifiers known to this crate.
///
/// Anything else can still be called through
/// [`AlipayClient::call`](crate::AlipayClient::call) with its raw name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    TradePay,
    TradeQuery,
    TradeRefund,
    TradeFastpayRefundQuery,
    TradeClose,
    TradeCancel,
    TradeCreate,
    TradePrecreate,
    TradeOrderSettle,
    TradePagePay,
    TradeWapPay,
    TradeAppPay,
    BillDownloadUrlQuery,
}

impl Method {
    /// Wire name sent in the `method` envelope field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TradePay => "alipay.trade.pay",
            Self::TradeQuery => "alipay.trade.query",
            Self::TradeRefund => "alipay.trade.refund",
            Self::TradeFastpayRefundQuery => "alipay.trade.fastpay.refund.query",
            Self::TradeClose => "alipay.trade.close",
            Self::TradeCancel => "alipay.trade.cancel",
            Self::TradeCreate => "alipay.trade.create",
            Self::TradePrecreate => "alipay.trade.precreate",
            Self::TradeOrderSettle => "alipay.trade.order.settle",
            Self::TradePagePay => "alipay.trade.page.pay",
            Self::TradeWapPay => "alipay.trade.wap.pay",
            Self::TradeAppPay => "alipay.trade.app.pay",
            Self::BillDownloadUrlQuery => "alipay.data.dataservice.bill.downloadurl.query",
        }
    }

    /// Name of the business-result field the gateway answers with.
    pub fn response_key(&self) -> String {
        format!("{}_response", self.as_str().replace('.', "_"))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Trade lifecycle state reported by query responses and notifications.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TradeStatus {
    /// Created, waiting for the buyer to pay.
    WaitBuyerPay,
    /// Closed unpaid, or fully refunded.
    TradeClosed,
    /// Paid; refunds still possible.
    TradeSuccess,
    /// Paid and no longer refundable.
    TradeFinished,
    /// Absent from the response.
    #[default]
    Missing,
    /// A state this crate does not know.
    Unknown(String),
}

impl TradeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::WaitBuyerPay => "WAIT_BUYER_PAY",
            Self::TradeClosed => "TRADE_CLOSED",
            Self::TradeSuccess => "TRADE_SUCCESS",
            Self::TradeFinished => "TRADE_FINISHED",
            Self::Missing => "",
            Self::Unknown(other) => other,
        }
    }

    /// The buyer has paid (`TRADE_SUCCESS` or `TRADE_FINISHED`).
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::TradeSuccess | Self::TradeFinished)
    }
}

impl From<String> for TradeStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "WAIT_BUYER_PAY" => Self::WaitBuyerPay,
            "TRADE_CLOSED" => Self::TradeClosed,
            "TRADE_SUCCESS" => Self::TradeSuccess,
            "TRADE_FINISHED" => Self::TradeFinished,
            "" => Self::Missing,
            _ => Self::Unknown(value),
        }
    }
}

impl From<TradeStatus> for String {
    fn from(status: TradeStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified, decoded gateway reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply<T> {
    /// HTTP status code of the gateway response.
    pub status_code: u16,
    /// The decoded business fragment.
    pub data: T,
}

impl<T> Reply<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self { status_code, data }
    }

    /// Transform the payload, keeping the status code.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        Reply {
            status_code: self.status_code,
            data: f(self.data),
        }
    }
}

/// One funding channel used to pay a trade.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundBill {
    #[serde(default)]
    pub fund_channel: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub real_amount: String,
}

/// A line item attached to an order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsDetail {
    pub goods_id: String,
    pub goods_name: String,
    pub quantity: u32,
    /// Unit price in yuan.
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_url: Option<String>,
}

/// Business extension parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendParams {
    /// Partner id of the system service provider, for rebates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_service_provider_id: Option<String>,
    /// Huabei instalment count (3, 6 or 12).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hb_fq_num: Option<String>,
    /// Share of the instalment fee the seller covers (`100` or `0`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hb_fq_seller_percent: Option<String>,
}

/// Sign and non-zero-ness of a plain decimal such as `"12"`, `"-0.50"` or
/// `"+3.5"`. `None` when malformed.
fn parse_amount(amount: &str) -> Option<(bool, bool)> {
    let amount = amount.trim();
    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount.strip_prefix('+').unwrap_or(amount)),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let well_formed = whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit());
    let non_zero = whole.bytes().chain(fraction.bytes()).any(|b| b != b'0');
    well_formed.then_some((negative, non_zero))
}

/// Whether a decimal amount string is strictly positive.
///
/// Anything malformed counts as not positive.
pub(crate) fn is_positive_amount(amount: &str) -> bool {
    matches!(parse_amount(amount), Some((false, true)))
}

/// Whether an amount is absent or a zero-valued decimal.
///
/// Negative and malformed amounts are not zero.
pub(crate) fn is_zero_amount(amount: &str) -> bool {
    amount.trim().is_empty() || matches!(parse_amount(amount), Some((_, false)))
}
