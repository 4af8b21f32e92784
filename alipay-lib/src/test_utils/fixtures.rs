//! Fixture keys and gateway-side signing helpers.
//!
//! The key pairs are throwaway 2048-bit RSA keys generated for tests only.

use crate::canonical::{Params, SIGN_FIELD, SIGN_TYPE_FIELD};
use crate::crypto::{Credentials, Signer, Verifier};

/// Application id used throughout the fixtures.
pub const TEST_APP_ID: &str = "2014072300007148";

/// Merchant private key, PKCS#1 PEM.
pub const APP_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/app_private_key.pem");

/// Same merchant key, PKCS#8 PEM.
pub const APP_PRIVATE_KEY_PKCS8: &str =
    include_str!("../../tests/fixtures/app_private_key_pkcs8.pem");

/// Merchant public key, SPKI PEM.
pub const APP_PUBLIC_KEY: &str = include_str!("../../tests/fixtures/app_public_key.pem");

/// Gateway private key, PKCS#1 PEM. Only tests ever hold this half.
pub const GATEWAY_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/gateway_private_key.pem");

/// Gateway public key, SPKI PEM.
pub const GATEWAY_PUBLIC_KEY: &str = include_str!("../../tests/fixtures/gateway_public_key.pem");

/// `openssl dgst -sha256 -sign app_private_key.pem` over the canonical string
/// `app_id=2014072300007148&biz_content={"foo":"bar"}&method=alipay.trade.pay&timestamp=2024-01-01 00:00:00&version=1.0`.
pub const SCENARIO_SIGNATURE: &str = "mhN5539fgLZTltAlrQqs/dwUO+/Jcp76bVLSYYwKcHe0MJHUwUM4KeVOWE/t5ycRkB6CEfMb4SQ0/HiGyB1iYpclJV5ynQGAp+wzlyPSINYYEzutXK2yTF4sY8cfl710OgQsFGf8/YUvE/lNhgmiDIIi8zinMixJRQUBq8wpskXUmClcFJYXPDTXqcGbwfXA20gjvZlcshqcFss/rKxoF0xNEdUZDM4eBewsdUxihtX5QzQdSl/mYSq6tmnSg+cFd0JhCY5g4Xx4sXdfyk3Ijs5MF2Lg3g/CLTzpyhUYntdy1P0V3+urhZGpKzlai9Qk7Lkpx9Z0FmCUym0wXEjriw==";

/// Merchant credentials that trust the fixture gateway key.
pub fn test_credentials() -> Credentials {
    Credentials::new(
        TEST_APP_ID,
        Signer::from_pem(APP_PRIVATE_KEY).expect("fixture app key"),
        Verifier::from_pem(GATEWAY_PUBLIC_KEY).expect("fixture gateway key"),
    )
}

/// Verifier for signatures produced with the merchant key.
pub fn app_verifier() -> Verifier {
    Verifier::from_pem(APP_PUBLIC_KEY).expect("fixture app public key")
}

/// Signer holding the gateway private key.
pub fn gateway_signer() -> Signer {
    Signer::from_pem(GATEWAY_PRIVATE_KEY).expect("fixture gateway key")
}

/// Build a gateway response body whose `sign` covers `fragment` byte for byte.
///
/// `fragment` is embedded verbatim, so its whitespace and key order are
/// exactly what gets signed.
pub fn signed_response_body(response_key: &str, fragment: &str) -> String {
    let sign = gateway_signer()
        .sign(fragment.as_bytes())
        .expect("fixture signing");
    format!(r#"{{"{}":{},"sign":"{}"}}"#, response_key, fragment, sign)
}

/// Sign a notification the way the gateway does: canonicalize every field
/// except `sign`/`sign_type`, then attach both.
pub fn sign_notification(mut params: Params) -> Params {
    params.remove(SIGN_FIELD);
    params.remove(SIGN_TYPE_FIELD);
    let sign = gateway_signer()
        .sign(params.canonical_string().as_bytes())
        .expect("fixture signing");
    params.set(SIGN_TYPE_FIELD, "RSA2");
    params.set(SIGN_FIELD, sign);
    params
}
