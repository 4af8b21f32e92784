//! Ending unpaid trades: `alipay.trade.close` and `alipay.trade.cancel`.

use serde::{Deserialize, Serialize};

use super::ResponseStatus;

/// Close a trade that is still waiting for payment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_trade_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
}

impl CloseParam {
    pub fn by_out_trade_no(out_trade_no: impl Into<String>) -> Self {
        Self {
            out_trade_no: Some(out_trade_no.into()),
            ..Default::default()
        }
    }
}

/// Business fragment of `alipay_trade_close_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
}

/// Cancel a trade; paid trades are refunded, unpaid ones closed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_trade_no: Option<String>,
}

impl CancelParam {
    pub fn by_out_trade_no(out_trade_no: impl Into<String>) -> Self {
        Self {
            trade_no: None,
            out_trade_no: Some(out_trade_no.into()),
        }
    }
}

/// Business fragment of `alipay_trade_cancel_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub trade_no: String,
    #[serde(default)]
    pub out_trade_no: String,
    /// `Y` when the cancel should be sent again.
    #[serde(default)]
    pub retry_flag: String,
    /// What the cancel did: `close`, `refund` or empty.
    #[serde(default)]
    pub action: String,
}

impl CancelResponse {
    /// The gateway asks for the cancel to be repeated.
    pub fn needs_retry(&self) -> bool {
        self.retry_flag == "Y"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_retry_flag() {
        let retry: CancelResponse = serde_json::from_str(
            r#"{"code":"40004","msg":"Business Failed","sub_code":"ACQ.SYSTEM_ERROR","retry_flag":"Y"}"#,
        )
        .unwrap();
        assert!(retry.needs_retry());

        let done: CancelResponse = serde_json::from_str(
            r#"{"code":"10000","msg":"Success","retry_flag":"N","action":"refund"}"#,
        )
        .unwrap();
        assert!(!done.needs_retry());
        assert_eq!(done.action, "refund");
    }

    #[test]
    fn test_close_param() {
        assert_eq!(
            serde_json::to_string(&CloseParam::by_out_trade_no("T1")).unwrap(),
            r#"{"out_trade_no":"T1"}"#
        );
    }
}
