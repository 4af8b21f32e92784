use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use super::keys::{parse_private_key, parse_public_key};
use crate::{AlipayError, Result};

/// RSA2 signer over a merchant private key.
///
/// PKCS#1 v1.5 signatures are deterministic: the same key and input always
/// produce the same base64 text.
#[derive(Clone)]
pub struct Signer {
    key: RsaPrivateKey,
}

impl Signer {
    /// Wrap an already-parsed private key.
    pub fn new(key: RsaPrivateKey) -> Self {
        Self { key }
    }

    /// Load a private key from PEM (PKCS#1/PKCS#8) or bare base64 DER.
    pub fn from_pem(text: &str) -> Result<Self> {
        Ok(Self::new(parse_private_key(text)?))
    }

    /// Public half of the key, for handing to the provider console.
    pub fn public_key(&self) -> RsaPublicKey {
        self.key.to_public_key()
    }

    /// Sign `data` and return the signature as standard base64.
    pub fn sign(&self, data: &[u8]) -> Result<String> {
        let digest = Sha256::digest(data);
        let signature = self
            .key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| AlipayError::Signing(e.to_string()))?;
        Ok(STANDARD.encode(signature))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Signer { .. }")
    }
}

/// RSA2 verifier over the gateway public key.
///
/// Fails closed: anything other than a matching signature is an
/// [`AlipayError::Verification`].
#[derive(Clone, Debug)]
pub struct Verifier {
    key: RsaPublicKey,
}

impl Verifier {
    /// Wrap an already-parsed public key.
    pub fn new(key: RsaPublicKey) -> Self {
        Self { key }
    }

    /// Load a public key from PEM (SPKI/PKCS#1) or bare base64 DER.
    pub fn from_pem(text: &str) -> Result<Self> {
        Ok(Self::new(parse_public_key(text)?))
    }

    /// Check a raw signature over `data`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let digest = Sha256::digest(data);
        self.key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .map_err(|_| AlipayError::Verification("signature does not match".into()))
    }

    /// Check a base64-encoded signature over `data`.
    pub fn verify_base64(&self, data: &[u8], signature: &str) -> Result<()> {
        let raw = STANDARD
            .decode(signature.trim())
            .map_err(|_| AlipayError::Verification("signature is not valid base64".into()))?;
        self.verify(data, &raw)
    }
}
