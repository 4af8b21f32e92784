//! Shared fixtures for integration tests: the merchant and gateway key pairs
//! under `tests/fixtures/`, and helpers that play the gateway's side.

#![allow(dead_code)]

use alipay_lib::{Credentials, Params, Signer, Verifier};

pub const APP_ID: &str = "2014072300007148";

pub const APP_PRIVATE_KEY: &str = include_str!("../fixtures/app_private_key.pem");
pub const APP_PUBLIC_KEY: &str = include_str!("../fixtures/app_public_key.pem");
pub const GATEWAY_PRIVATE_KEY: &str = include_str!("../fixtures/gateway_private_key.pem");
pub const GATEWAY_PUBLIC_KEY: &str = include_str!("../fixtures/gateway_public_key.pem");

pub fn credentials() -> Credentials {
    Credentials::from_pem(APP_ID, APP_PRIVATE_KEY, GATEWAY_PUBLIC_KEY).unwrap()
}

pub fn app_verifier() -> Verifier {
    Verifier::from_pem(APP_PUBLIC_KEY).unwrap()
}

pub fn gateway_verifier() -> Verifier {
    Verifier::from_pem(GATEWAY_PUBLIC_KEY).unwrap()
}

pub fn gateway_signer() -> Signer {
    Signer::from_pem(GATEWAY_PRIVATE_KEY).unwrap()
}

/// A response body whose `sign` covers `fragment` exactly as written.
pub fn signed_body(response_key: &str, fragment: &str) -> String {
    let sign = gateway_signer().sign(fragment.as_bytes()).unwrap();
    format!(r#"{{"{}":{},"sign":"{}"}}"#, response_key, fragment, sign)
}

/// Sign notification fields with the gateway key.
pub fn sign_notification(mut params: Params) -> Params {
    params.remove("sign");
    params.remove("sign_type");
    let sign = gateway_signer()
        .sign(params.canonical_string().as_bytes())
        .unwrap();
    params.set("sign_type", "RSA2");
    params.set("sign", sign);
    params
}
