//! Loading RSA keys from PEM text, files, or bare base64 DER.
//!
//! The provider console hands out keys as a single base64 line without PEM
//! armor; OpenSSL tooling produces armored PKCS#1 or PKCS#8. All three forms
//! are accepted.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

use super::{Signer, Verifier};
use crate::errors::KeyError;
use crate::Result;

/// Merchant credentials: application id, merchant private key and gateway
/// public key.
///
/// Immutable once built; share it freely between concurrent calls.
pub struct Credentials {
    app_id: String,
    signer: Signer,
    verifier: Verifier,
}

impl Credentials {
    /// Assemble credentials from already-loaded keys.
    pub fn new(app_id: impl Into<String>, signer: Signer, verifier: Verifier) -> Self {
        Self {
            app_id: app_id.into(),
            signer,
            verifier,
        }
    }

    /// Load credentials from key text (PEM or bare base64 DER).
    pub fn from_pem(
        app_id: impl Into<String>,
        private_key: &str,
        gateway_public_key: &str,
    ) -> Result<Self> {
        Ok(Self::new(
            app_id,
            Signer::from_pem(private_key)?,
            Verifier::from_pem(gateway_public_key)?,
        ))
    }

    /// Load credentials from key files.
    pub fn from_files(
        app_id: impl Into<String>,
        private_key_path: impl AsRef<Path>,
        gateway_public_key_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let private_key = read_key_file(private_key_path.as_ref())?;
        let public_key = read_key_file(gateway_public_key_path.as_ref())?;
        Self::from_pem(app_id, &private_key, &public_key)
    }

    /// Application id assigned by the provider.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Merchant signing key.
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Gateway verification key.
    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}

fn read_key_file(path: &Path) -> std::result::Result<String, KeyError> {
    std::fs::read_to_string(path).map_err(|e| KeyError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Extract the label of the first PEM block, e.g. `RSA PRIVATE KEY`.
fn pem_label(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("-----BEGIN ")?;
    let end = rest.find("-----")?;
    Some(&rest[..end])
}

fn decode_bare(text: &str) -> std::result::Result<Vec<u8>, KeyError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| KeyError::Base64(e.to_string()))
}

/// Parse a merchant private key (PKCS#1 or PKCS#8, armored or bare).
pub fn parse_private_key(text: &str) -> std::result::Result<RsaPrivateKey, KeyError> {
    let text = text.trim();
    match pem_label(text) {
        Some("RSA PRIVATE KEY") => {
            RsaPrivateKey::from_pkcs1_pem(text).map_err(|e| KeyError::Parse {
                kind: "PKCS#1 private",
                reason: e.to_string(),
            })
        }
        Some("PRIVATE KEY") => RsaPrivateKey::from_pkcs8_pem(text).map_err(|e| KeyError::Parse {
            kind: "PKCS#8 private",
            reason: e.to_string(),
        }),
        Some(other) => Err(KeyError::UnsupportedLabel(other.to_string())),
        None => {
            let der = decode_bare(text)?;
            RsaPrivateKey::from_pkcs8_der(&der)
                .or_else(|_| RsaPrivateKey::from_pkcs1_der(&der))
                .map_err(|e| KeyError::Parse {
                    kind: "private",
                    reason: e.to_string(),
                })
        }
    }
}

/// Parse a gateway public key (SPKI or PKCS#1, armored or bare).
pub fn parse_public_key(text: &str) -> std::result::Result<RsaPublicKey, KeyError> {
    let text = text.trim();
    match pem_label(text) {
        Some("PUBLIC KEY") => {
            RsaPublicKey::from_public_key_pem(text).map_err(|e| KeyError::Parse {
                kind: "SPKI public",
                reason: e.to_string(),
            })
        }
        Some("RSA PUBLIC KEY") => {
            RsaPublicKey::from_pkcs1_pem(text).map_err(|e| KeyError::Parse {
                kind: "PKCS#1 public",
                reason: e.to_string(),
            })
        }
        Some(other) => Err(KeyError::UnsupportedLabel(other.to_string())),
        None => {
            let der = decode_bare(text)?;
            RsaPublicKey::from_public_key_der(&der)
                .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
                .map_err(|e| KeyError::Parse {
                    kind: "public",
                    reason: e.to_string(),
                })
        }
    }
}
