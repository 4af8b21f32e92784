//! RSA key material and the RSA2 signature scheme.
//!
//! The gateway protocol signs with RSA PKCS#1 v1.5 over a SHA-256 digest
//! ("RSA2" in provider terms) and transports signatures as standard base64.
//!
//! - [`Signer`] holds the merchant private key.
//! - [`Verifier`] holds the gateway public key.
//! - [`Credentials`] bundles both with the application id; it is loaded once
//!   and never mutated afterwards.

mod keys;
mod signer;

pub use keys::{parse_private_key, parse_public_key, Credentials};
pub use signer::{Signer, Verifier};
