//! Verification of Stripe webhook signatures.
//!
//! Stripe signs each delivery by sending a `Stripe-Signature` header of the form
//! `t=<unix timestamp>,v1=<hex hmac>[,v1=<hex hmac>...]`, where each `v1` value is the HMAC-SHA256 of
//! `"{timestamp}.{raw body}"` keyed with the endpoint's signing secret. Multiple `v1` entries appear while a secret
//! is being rolled; the delivery is valid if any of them matches. Timestamps outside the tolerance window are
//! rejected to blunt replay attacks.

use std::str::FromStr;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error)]
pub enum SignatureError {
    #[error("No signature header was provided.")]
    MissingHeader,
    #[error("Malformed signature header. {0}")]
    MalformedHeader(String),
    #[error("Signature timestamp is outside of the tolerance window.")]
    StaleTimestamp,
    #[error("HMAC signature mismatch.")]
    VerificationFailed,
}

/// The parsed contents of a `Stripe-Signature` header. The `v1` values are hex-decoded up front so that
/// verification can compare raw MAC bytes in constant time.
#[derive(Debug, Clone)]
pub struct StripeSignature {
    pub timestamp: i64,
    pub signatures: Vec<Vec<u8>>,
}

impl FromStr for StripeSignature {
    type Err = SignatureError;

    fn from_str(header: &str) -> Result<Self, Self::Err> {
        let mut timestamp = None;
        let mut signatures = Vec::new();
        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => {
                    let t = value
                        .parse::<i64>()
                        .map_err(|e| SignatureError::MalformedHeader(format!("Invalid timestamp: {e}")))?;
                    timestamp = Some(t);
                },
                "v1" => {
                    let sig = hex::decode(value)
                        .map_err(|e| SignatureError::MalformedHeader(format!("Invalid v1 signature: {e}")))?;
                    signatures.push(sig);
                },
                // Stripe also sends a legacy v0 scheme, which is deliberately ignored.
                _ => {},
            }
        }
        let timestamp =
            timestamp.ok_or_else(|| SignatureError::MalformedHeader("No timestamp present".to_string()))?;
        if signatures.is_empty() {
            return Err(SignatureError::MalformedHeader("No v1 signature present".to_string()));
        }
        Ok(Self { timestamp, signatures })
    }
}

/// Computes the hex-encoded HMAC-SHA256 signature for the given body and timestamp. This is the value Stripe puts in
/// a `v1` entry; test harnesses and replay tooling use it to construct valid headers.
pub fn sign_payload(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Builds a complete `Stripe-Signature` header value for the given body.
pub fn signature_header(secret: &str, timestamp: i64, body: &[u8]) -> String {
    format!("t={timestamp},v1={}", sign_payload(secret, timestamp, body))
}

/// Verifies a `Stripe-Signature` header against the raw request body.
///
/// `tolerance` is the maximum allowed clock skew in seconds between the signature timestamp and the server clock.
/// The HMAC comparison runs in constant time via [`Mac::verify_slice`].
pub fn verify_webhook_signature(
    secret: &str,
    header: &str,
    body: &[u8],
    tolerance: i64,
) -> Result<(), SignatureError> {
    let signature = header.parse::<StripeSignature>()?;
    let now = chrono::Utc::now().timestamp();
    if (now - signature.timestamp).abs() > tolerance {
        return Err(SignatureError::StaleTimestamp);
    }
    for candidate in &signature.signatures {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
        mac.update(signature.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);
        if mac.verify_slice(candidate).is_ok() {
            return Ok(());
        }
    }
    Err(SignatureError::VerificationFailed)
}
