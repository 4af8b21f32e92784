//! `alipay.trade.order.settle`: split a paid trade's funds between accounts.

use serde::{Deserialize, Serialize};

use super::ResponseStatus;

/// One transfer in a settlement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyDetail {
    /// Paying account: a 16-digit user id starting with `2088`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_out: Option<String>,
    /// Receiving account, same format as `trans_out`.
    pub trans_in: String,
    /// Amount in yuan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Integer percentage in `(0, 100]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// Parameters for [`AlipayClient::order_settle`](crate::AlipayClient::order_settle).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettleParam {
    /// Idempotency key for this settlement.
    pub out_request_no: String,
    pub trade_no: String,
    pub royalty_parameters: Vec<RoyaltyDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
}

/// Business fragment of `alipay_trade_order_settle_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettleResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_param_shape() {
        let param = OrderSettleParam {
            out_request_no: "S1".into(),
            trade_no: "2014030411001007850000672009".into(),
            royalty_parameters: vec![RoyaltyDetail {
                trans_in: "2088101126708402".into(),
                amount: Some("0.10".into()),
                ..Default::default()
            }],
            operator_id: None,
        };
        let json: serde_json::Value = serde_json::to_value(&param).unwrap();
        assert_eq!(json["royalty_parameters"][0]["amount"], "0.10");
        assert!(json["royalty_parameters"][0].get("trans_out").is_none());
        assert!(json.get("operator_id").is_none());
    }
}
