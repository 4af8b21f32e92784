//! Parsing and verifying synchronous gateway responses.
//!
//! A gateway body looks like:
//!
//! ```text
//! {"alipay_trade_pay_response":{"code":"10000","msg":"Success",...},"sign":"..."}
//! ```
//!
//! The `sign` covers the exact bytes of the `*_response` value as received,
//! so the fragment is captured as raw JSON and verified before anything
//! parses it. A [`GatewayResponse`] can only be obtained through
//! [`GatewayResponse::from_body`], which enforces that.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::canonical::SIGN_FIELD;
use crate::crypto::Verifier;
use crate::{AlipayError, Result};

/// Gateway `code` for a call the gateway accepted.
///
/// This is a protocol-level success only; see [`ResponseStatus::is_success`].
pub const GATEWAY_SUCCESS: &str = "10000";

/// Marker every business-result key contains.
const RESPONSE_MARKER: &str = "response";

/// Status block shared by every gateway response.
///
/// Response types embed it as a named `status` field flattened on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Gateway result code, `10000` on success.
    #[serde(default)]
    pub code: String,
    /// Gateway result message.
    #[serde(default)]
    pub msg: String,
    /// Business error code, e.g. `ACQ.TRADE_NOT_EXIST`.
    #[serde(default)]
    pub sub_code: String,
    /// Business error description.
    #[serde(default)]
    pub sub_msg: String,
}

impl ResponseStatus {
    /// The gateway accepted the call and reported no business error.
    ///
    /// This does not mean the trade itself succeeded: check the operation's
    /// own fields (e.g. `trade_status`) for that.
    pub fn is_success(&self) -> bool {
        self.code == GATEWAY_SUCCESS && self.sub_code.is_empty()
    }

    /// The sub-code reported by the gateway, if any.
    pub fn sub_code(&self) -> Option<&str> {
        (!self.sub_code.is_empty()).then_some(self.sub_code.as_str())
    }
}

/// The pieces of a raw body, before verification.
#[derive(Debug)]
struct Extracted {
    key: String,
    fragment: Box<RawValue>,
    sign: Option<Box<RawValue>>,
}

fn extract(body: &[u8]) -> Result<Extracted> {
    let mut object: BTreeMap<String, Box<RawValue>> = serde_json::from_slice(body)
        .map_err(|e| AlipayError::Protocol(format!("response body is not a JSON object: {}", e)))?;

    let sign = object.remove(SIGN_FIELD);
    let key = object
        .keys()
        .find(|key| key.contains(RESPONSE_MARKER))
        .cloned()
        .ok_or_else(|| AlipayError::Protocol("response has no business-result field".into()))?;
    let fragment = object
        .remove(&key)
        .ok_or_else(|| AlipayError::Protocol("response has no business-result field".into()))?;

    Ok(Extracted {
        key,
        fragment,
        sign,
    })
}

/// A verified gateway response.
///
/// Either the fragment's signature matched the gateway public key, or the
/// gateway sent no signature and the fragment is a well-formed failure
/// report (the gateway leaves some error responses unsigned).
#[derive(Debug)]
pub struct GatewayResponse {
    status_code: u16,
    response_key: String,
    fragment: Box<RawValue>,
    signed: bool,
}

impl GatewayResponse {
    /// Split a raw body into the business fragment and `sign`, then verify.
    ///
    /// On any verification failure the fragment is dropped and only an
    /// [`AlipayError::Verification`] is returned.
    pub fn from_body(status_code: u16, body: &[u8], verifier: &Verifier) -> Result<Self> {
        let Extracted {
            key,
            fragment,
            sign,
        } = extract(body)?;

        let signed = match sign {
            Some(raw) => {
                let sign: String = serde_json::from_str(raw.get()).map_err(|_| {
                    AlipayError::Verification(format!("{} signature is not a string", key))
                })?;
                if let Err(err) = verifier.verify_base64(fragment.get().as_bytes(), &sign) {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(response_key = %key, "gateway response signature rejected");
                    return Err(err);
                }
                true
            }
            None => {
                if !unsigned_allowed(&fragment) {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(response_key = %key, "unsigned gateway response rejected");
                    return Err(AlipayError::Verification(format!(
                        "{} carries no signature and does not report a failure",
                        key
                    )));
                }
                false
            }
        };

        Ok(Self {
            status_code,
            response_key: key,
            fragment,
            signed,
        })
    }

    /// HTTP status code of the gateway response.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Name of the business-result field, e.g. `alipay_trade_pay_response`
    /// or `error_response`.
    pub fn response_key(&self) -> &str {
        &self.response_key
    }

    /// Whether the fragment carried a (valid) signature.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// The business fragment exactly as received.
    pub fn raw(&self) -> &str {
        self.fragment.get()
    }

    /// Decode the fragment's status block.
    pub fn status(&self) -> Result<ResponseStatus> {
        self.decode()
    }

    /// Decode the fragment into an operation's response type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(self.fragment.get()).map_err(|e| {
            AlipayError::Serialization(format!(
                "failed to decode {}: {}",
                self.response_key, e
            ))
        })
    }
}

/// An unsigned fragment is only trusted as a failure report: an object whose
/// `code` is a string (appearing once) other than [`GATEWAY_SUCCESS`].
fn unsigned_allowed(fragment: &RawValue) -> bool {
    #[derive(Deserialize)]
    struct Code {
        code: String,
    }

    serde_json::from_str::<Code>(fragment.get())
        .map(|status| status.code != GATEWAY_SUCCESS)
        .unwrap_or(false)
}
