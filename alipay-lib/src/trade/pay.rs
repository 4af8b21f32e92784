//! `alipay.trade.pay`: in-store payment with a scanned buyer code.

use serde::{Deserialize, Serialize};

use super::{ExtendParams, FundBill, GoodsDetail, ResponseStatus};

/// Scene for a barcode scanned from the buyer's phone.
pub const SCENE_BAR_CODE: &str = "bar_code";
/// Scene for a sound-wave payment.
pub const SCENE_WAVE_CODE: &str = "wave_code";

/// Parameters for [`AlipayClient::pay`](crate::AlipayClient::pay).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayParam {
    pub out_trade_no: String,
    /// `bar_code` or `wave_code`.
    pub scene: String,
    /// Payment code read from the buyer's device.
    pub auth_code: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
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
}

impl PayParam {
    /// A barcode payment for `total_amount`.
    pub fn bar_code(
        out_trade_no: impl Into<String>,
        auth_code: impl Into<String>,
        subject: impl Into<String>,
        total_amount: impl Into<String>,
    ) -> Self {
        Self {
            out_trade_no: out_trade_no.into(),
            scene: SCENE_BAR_CODE.to_string(),
            auth_code: auth_code.into(),
            subject: subject.into(),
            total_amount: Some(total_amount.into()),
            ..Default::default()
        }
    }

    /// A sound-wave payment for `total_amount`.
    pub fn wave_code(
        out_trade_no: impl Into<String>,
        auth_code: impl Into<String>,
        subject: impl Into<String>,
        total_amount: impl Into<String>,
    ) -> Self {
        Self {
            scene: SCENE_WAVE_CODE.to_string(),
            ..Self::bar_code(out_trade_no, auth_code, subject, total_amount)
        }
    }
}

/// A voucher applied to the trade.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoucherDetail {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub merchant_contribute: String,
    pub other_contribute: String,
    pub memo: String,
    pub template_id: String,
    pub purchase_buyer_contribute: String,
    pub purchase_merchant_contribute: String,
    pub purchase_ant_contribute: String,
}

/// Business fragment of `alipay_trade_pay_response`.
///
/// `code` `10003` (`status.code`) means the buyer still has to confirm on
/// their phone; poll with `query` until the trade settles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub buyer_logon_id: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub receipt_amount: String,
    #[serde(default)]
    pub buyer_pay_amount: String,
    #[serde(default)]
    pub point_amount: String,
    #[serde(default)]
    pub invoice_amount: String,
    #[serde(default)]
    pub gmt_payment: String,
    #[serde(default)]
    pub fund_bill_list: Vec<FundBill>,
    #[serde(default)]
    pub card_balance: String,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub buyer_user_id: String,
    #[serde(default)]
    pub discount_goods_detail: String,
    #[serde(default)]
    pub voucher_detail_list: Vec<VoucherDetail>,
    #[serde(default)]
    pub business_params: String,
    #[serde(default)]
    pub buyer_user_type: String,
}

/// Gateway code for a payment still waiting on the buyer.
pub const PAY_WAITING_BUYER: &str = "10003";

impl PayResponse {
    /// The buyer has not confirmed yet.
    pub fn is_waiting_buyer(&self) -> bool {
        self.status.code == PAY_WAITING_BUYER
    }
}
