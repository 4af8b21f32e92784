//! Browser and app checkout: page pay, wap pay and app pay.
//!
//! These methods are never sent by the client. The signed query string is
//! handed to the buyer's browser (as a gateway URL) or to the mobile SDK,
//! and the gateway talks to the buyer directly.

use serde::{Deserialize, Serialize};

use super::{ExtendParams, Method};
use crate::{AlipayError, Result};

/// Product code for desktop web checkout.
pub const PRODUCT_PAGE_PAY: &str = "FAST_INSTANT_TRADE_PAY";
/// Product code for mobile web checkout.
pub const PRODUCT_WAP_PAY: &str = "QUICK_WAP_WAY";
/// Product code for in-app checkout.
pub const PRODUCT_APP_PAY: &str = "QUICK_MSECURITY_PAY";

/// A checkout payload with a fixed product code.
pub trait CheckoutParam: Serialize + Clone {
    /// Gateway method for this checkout flavour.
    const METHOD: Method;
    /// Product code the payload must carry.
    const PRODUCT_CODE: &'static str;

    /// Overwrite the payload's product code.
    fn set_product_code(&mut self, code: &str);

    /// `(field, value)` pairs that must be non-empty.
    fn required_fields(&self) -> [(&'static str, &str); 4];

    /// Reject a payload with an empty required field.
    fn validate(&self) -> Result<()> {
        for (field, value) in self.required_fields() {
            if value.trim().is_empty() {
                return Err(AlipayError::invalid_data(field, "cannot be empty"));
            }
        }
        Ok(())
    }

    /// A validated copy carrying the right product code.
    fn prepared(&self) -> Result<Self> {
        self.validate()?;
        let mut param = self.clone();
        param.set_product_code(Self::PRODUCT_CODE);
        Ok(param)
    }
}

macro_rules! common_required_fields {
    () => {
        fn required_fields(&self) -> [(&'static str, &str); 4] {
            [
                ("out_trade_no", &self.out_trade_no),
                ("total_amount", &self.total_amount),
                ("subject", &self.subject),
                ("timeout_express", &self.timeout_express),
            ]
        }

        fn set_product_code(&mut self, code: &str) {
            self.product_code = code.to_string();
        }
    };
}

/// Desktop web checkout (`alipay.trade.page.pay`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePayParam {
    pub out_trade_no: String,
    /// Set by the client; any value given here is replaced.
    pub product_code: String,
    pub total_amount: String,
    pub subject: String,
    /// Latest payment time, e.g. `15m`, `2h`, `1d`, `1c` (end of today).
    pub timeout_express: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// JSON-encoded line items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods_detail: Option<String>,
    /// Echoed back verbatim in the notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passback_params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_params: Option<ExtendParams>,
    /// `0` virtual goods, `1` physical goods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_pay_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_pay_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_pay_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "qrcode_width")]
    pub qr_code_width: Option<String>,
}

impl PagePayParam {
    pub fn new(
        out_trade_no: impl Into<String>,
        total_amount: impl Into<String>,
        subject: impl Into<String>,
        timeout_express: impl Into<String>,
    ) -> Self {
        Self {
            out_trade_no: out_trade_no.into(),
            product_code: PRODUCT_PAGE_PAY.to_string(),
            total_amount: total_amount.into(),
            subject: subject.into(),
            timeout_express: timeout_express.into(),
            ..Default::default()
        }
    }
}

impl CheckoutParam for PagePayParam {
    const METHOD: Method = Method::TradePagePay;
    const PRODUCT_CODE: &'static str = PRODUCT_PAGE_PAY;
    common_required_fields!();
}

/// Mobile web checkout (`alipay.trade.wap.pay`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WapPayParam {
    pub out_trade_no: String,
    pub product_code: String,
    pub total_amount: String,
    pub subject: String,
    pub timeout_express: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Where the buyer lands after quitting checkout midway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quit_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passback_params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_params: Option<ExtendParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_pay_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_pay_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl WapPayParam {
    pub fn new(
        out_trade_no: impl Into<String>,
        total_amount: impl Into<String>,
        subject: impl Into<String>,
        timeout_express: impl Into<String>,
    ) -> Self {
        Self {
            out_trade_no: out_trade_no.into(),
            product_code: PRODUCT_WAP_PAY.to_string(),
            total_amount: total_amount.into(),
            subject: subject.into(),
            timeout_express: timeout_express.into(),
            ..Default::default()
        }
    }
}

impl CheckoutParam for WapPayParam {
    const METHOD: Method = Method::TradeWapPay;
    const PRODUCT_CODE: &'static str = PRODUCT_WAP_PAY;
    common_required_fields!();
}

/// In-app checkout (`alipay.trade.app.pay`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPayParam {
    pub out_trade_no: String,
    pub product_code: String,
    pub total_amount: String,
    pub subject: String,
    pub timeout_express: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passback_params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_params: Option<ExtendParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_pay_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_pay_channels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl AppPayParam {
    pub fn new(
        out_trade_no: impl Into<String>,
        total_amount: impl Into<String>,
        subject: impl Into<String>,
        timeout_express: impl Into<String>,
    ) -> Self {
        Self {
            out_trade_no: out_trade_no.into(),
            product_code: PRODUCT_APP_PAY.to_string(),
            total_amount: total_amount.into(),
            subject: subject.into(),
            timeout_express: timeout_express.into(),
            ..Default::default()
        }
    }
}

impl CheckoutParam for AppPayParam {
    const METHOD: Method = Method::TradeAppPay;
    const PRODUCT_CODE: &'static str = PRODUCT_APP_PAY;
    common_required_fields!();
}
