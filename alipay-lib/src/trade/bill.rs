//! `alipay.data.dataservice.bill.downloadurl.query`.
//!
//! Only the signed URL lookup lives here. Fetching and unpacking the archive
//! behind the URL involves no signing and is left to the caller.

use serde::{Deserialize, Serialize};

use super::ResponseStatus;

/// Bill of trades settled through the gateway.
pub const BILL_TYPE_TRADE: &str = "trade";
/// Bill of balance movements on the merchant account.
pub const BILL_TYPE_SIGNCUSTOMER: &str = "signcustomer";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDownloadUrlQueryParam {
    /// [`BILL_TYPE_TRADE`] or [`BILL_TYPE_SIGNCUSTOMER`].
    pub bill_type: String,
    /// `yyyy-MM-dd` for a daily bill, `yyyy-MM` for a monthly one.
    pub bill_date: String,
}

impl BillDownloadUrlQueryParam {
    pub fn new(bill_type: impl Into<String>, bill_date: impl Into<String>) -> Self {
        Self {
            bill_type: bill_type.into(),
            bill_date: bill_date.into(),
        }
    }
}

/// Business fragment of `alipay_data_dataservice_bill_downloadurl_query_response`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDownloadUrlQueryResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    /// Expires 30 seconds after it is issued.
    #[serde(default)]
    pub bill_download_url: String,
}

impl BillDownloadUrlQueryResponse {
    /// No bill exists for that date yet.
    pub fn is_bill_not_exist(&self) -> bool {
        self.status.sub_code() == Some("isp.bill_not_exist")
    }
}
