//! `alipay.trade.query`.

use serde::{Deserialize, Serialize};

use super::{FundBill, ResponseStatus, TradeStatus};

/// Identify a trade by merchant order number or gateway trade number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_trade_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
}

impl QueryParam {
    pub fn by_out_trade_no(out_trade_no: impl Into<String>) -> Self {
        Self {
            out_trade_no: Some(out_trade_no.into()),
            trade_no: None,
        }
    }

    pub fn by_trade_no(trade_no: impl Into<String>) -> Self {
        Self {
            out_trade_no: None,
            trade_no: Some(trade_no.into()),
        }
    }
}

/// Business fragment of `alipay_trade_query_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub buyer_logon_id: String,
    #[serde(default)]
    pub trade_status: TradeStatus,
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
    pub send_pay_date: String,
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub terminal_id: String,
    #[serde(default)]
    pub fund_bill_list: Vec<FundBill>,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub buyer_user_id: String,
    #[serde(default)]
    pub buyer_user_type: String,
}

impl QueryResponse {
    /// The trade was not found (`ACQ.TRADE_NOT_EXIST`).
    pub fn is_trade_not_exist(&self) -> bool {
        self.status.sub_code() == Some("ACQ.TRADE_NOT_EXIST")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_uses_one_identifier() {
        assert_eq!(
            serde_json::to_string(&QueryParam::by_out_trade_no("T1")).unwrap(),
            r#"{"out_trade_no":"T1"}"#
        );
        assert_eq!(
            serde_json::to_string(&QueryParam::by_trade_no("2024")).unwrap(),
            r#"{"trade_no":"2024"}"#
        );
    }

    #[test]
    fn test_decode_trade_status() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"code":"10000","msg":"Success","trade_status":"WAIT_BUYER_PAY","total_amount":"88.88"}"#,
        )
        .unwrap();
        assert_eq!(response.trade_status, TradeStatus::WaitBuyerPay);
        assert_eq!(response.total_amount, "88.88");
    }

    #[test]
    fn test_trade_not_exist() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"code":"40004","msg":"Business Failed","sub_code":"ACQ.TRADE_NOT_EXIST","sub_msg":"交易不存在"}"#,
        )
        .unwrap();
        assert!(response.is_trade_not_exist());
        assert_eq!(response.trade_status, TradeStatus::Missing);
    }
}
