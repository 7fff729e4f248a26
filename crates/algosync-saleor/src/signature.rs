//! Verification of the `saleor-signature` header on webhook deliveries.
//!
//! Saleor signs each webhook body with a detached JWS (RS256) using a key
//! published at `/.well-known/jwks.json` on the instance. The header has the
//! form `{protected}..{signature}`. When the protected header carries
//! `"b64": false` the signing input is the raw body, otherwise its base64url
//! encoding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk};
use jsonwebtoken::{crypto, Algorithm, DecodingKey};
use serde::Deserialize;
use thiserror::Error;

pub use jsonwebtoken::jwk::JwkSet;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("malformed signature: {0}")]
    Malformed(String),

    #[error("unsupported signature algorithm {0}")]
    UnsupportedAlgorithm(String),

    /// No key in the set matches the header's `kid`. The key set may be
    /// stale; callers can refetch it once and retry.
    #[error("no signing key matches kid {0:?}")]
    UnknownKey(Option<String>),

    #[error("signing key is not an RSA key")]
    UnsupportedKey,

    #[error("signature does not match the payload")]
    Mismatch,
}

#[derive(Debug, Deserialize)]
struct ProtectedHeader {
    alg: String,
    #[serde(default)]
    kid: Option<String>,
    #[serde(default = "encoded_payload")]
    b64: bool,
}

fn encoded_payload() -> bool {
    true
}

/// Checks `signature` (the `saleor-signature` header value) against `body`
/// using the matching key from `keys`.
///
/// # Errors
///
/// Returns a [`SignatureError`] describing why the signature was rejected.
pub fn verify_webhook_signature(
    signature: &str,
    body: &[u8],
    keys: &JwkSet,
) -> Result<(), SignatureError> {
    let (protected, rest) = signature
        .split_once('.')
        .ok_or_else(|| SignatureError::Malformed("expected `header..signature`".to_string()))?;
    let (payload, encoded_signature) = rest
        .split_once('.')
        .ok_or_else(|| SignatureError::Malformed("expected `header..signature`".to_string()))?;
    if !payload.is_empty() {
        return Err(SignatureError::Malformed(
            "payload must be detached".to_string(),
        ));
    }
    if protected.is_empty() || encoded_signature.is_empty() {
        return Err(SignatureError::Malformed(
            "empty header or signature".to_string(),
        ));
    }

    let header = decode_protected_header(protected)?;
    if header.alg != "RS256" {
        return Err(SignatureError::UnsupportedAlgorithm(header.alg));
    }

    let jwk = find_key(keys, header.kid.as_deref())?;
    let key = rsa_decoding_key(jwk)?;

    let mut message = Vec::with_capacity(protected.len() + 1 + body.len());
    message.extend_from_slice(protected.as_bytes());
    message.push(b'.');
    if header.b64 {
        message.extend_from_slice(URL_SAFE_NO_PAD.encode(body).as_bytes());
    } else {
        message.extend_from_slice(body);
    }

    match crypto::verify(encoded_signature, &message, &key, Algorithm::RS256) {
        Ok(true) => Ok(()),
        Ok(false) => Err(SignatureError::Mismatch),
        Err(e) => Err(SignatureError::Malformed(e.to_string())),
    }
}

fn decode_protected_header(encoded: &str) -> Result<ProtectedHeader, SignatureError> {
    let raw = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| SignatureError::Malformed(format!("header is not base64url: {e}")))?;
    serde_json::from_slice(&raw)
        .map_err(|e| SignatureError::Malformed(format!("header is not a JWS header: {e}")))
}

/// A header without `kid` is accepted only when the set has a single key.
fn find_key<'a>(keys: &'a JwkSet, kid: Option<&str>) -> Result<&'a Jwk, SignatureError> {
    match kid {
        Some(kid) => keys
            .find(kid)
            .ok_or_else(|| SignatureError::UnknownKey(Some(kid.to_owned()))),
        None => match keys.keys.as_slice() {
            [only] => Ok(only),
            _ => Err(SignatureError::UnknownKey(None)),
        },
    }
}

fn rsa_decoding_key(jwk: &Jwk) -> Result<DecodingKey, SignatureError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| SignatureError::Malformed(format!("invalid RSA key: {e}"))),
        _ => Err(SignatureError::UnsupportedKey),
    }
}
