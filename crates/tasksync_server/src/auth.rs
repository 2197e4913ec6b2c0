//! Session tokens binding a user identity to a device identity.
//!
//! Tokens are signed with HMAC-SHA256 and carry no server-side state:
//! validity is purely a function of the token bytes and the shared
//! secret, so verification is stateless and idempotent and scaling the
//! service horizontally needs only a shared secret, never a session
//! store.
//!
//! ## Token format
//!
//! The signed payload is length-prefixed so identifiers of any length
//! survive the round-trip:
//! - 2 bytes: username length (big-endian) + username bytes
//! - 2 bytes: device id length (big-endian) + device id bytes
//! - 8 bytes: issuance time (Unix seconds, big-endian)
//! - 32 bytes: HMAC-SHA256 signature over everything before it
//!
//! The whole token is base64-encoded (URL-safe, unpadded) for transport
//! in a header.

use crate::error::{ServerError, ServerResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_LEN: usize = 32;

/// The identity a verified token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Username the token was issued for.
    pub username: String,
    /// Device the token is bound to.
    pub device_id: String,
    /// Issuance time, Unix seconds.
    pub issued_at: u64,
}

/// Mints and verifies session tokens.
///
/// Tokens are long-lived per device; there is no expiry enforcement
/// beyond what the signature scheme provides. Revocation happens by
/// rotating the secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
}

impl TokenIssuer {
    /// Creates an issuer with the given signing secret.
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Issues a signed token binding `username` to `device_id`.
    pub fn issue(&self, username: &str, device_id: &str) -> ServerResult<String> {
        let issued_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.issue_at(username, device_id, issued_at)
    }

    /// Issues a token with an explicit issuance time.
    pub fn issue_at(&self, username: &str, device_id: &str, issued_at: u64) -> ServerResult<String> {
        let username_bytes = username.as_bytes();
        let device_bytes = device_id.as_bytes();

        if username_bytes.len() > u16::MAX as usize || device_bytes.len() > u16::MAX as usize {
            return Err(ServerError::InvalidRequest("identifier too long".into()));
        }

        let mut payload =
            Vec::with_capacity(4 + username_bytes.len() + device_bytes.len() + 8 + SIGNATURE_LEN);
        payload.extend_from_slice(&(username_bytes.len() as u16).to_be_bytes());
        payload.extend_from_slice(username_bytes);
        payload.extend_from_slice(&(device_bytes.len() as u16).to_be_bytes());
        payload.extend_from_slice(device_bytes);
        payload.extend_from_slice(&issued_at.to_be_bytes());

        let signature = self.sign(&payload);

        let mut token = payload;
        token.extend_from_slice(&signature);
        Ok(URL_SAFE_NO_PAD.encode(token))
    }

    /// Verifies a token and returns the identity it binds.
    ///
    /// Fails closed on any malformed input; never panics.
    pub fn verify(&self, token: &str) -> ServerResult<TokenClaims> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| ServerError::unauthenticated("malformed token"))?;

        if bytes.len() < SIGNATURE_LEN + 12 {
            return Err(ServerError::unauthenticated("token too short"));
        }

        let (payload, signature) = bytes.split_at(bytes.len() - SIGNATURE_LEN);

        let expected = self.sign(payload);
        if signature != expected.as_slice() {
            return Err(ServerError::unauthenticated("invalid signature"));
        }

        let (username, rest) = read_string(payload)
            .ok_or_else(|| ServerError::unauthenticated("malformed token payload"))?;
        let (device_id, rest) =
            read_string(rest).ok_or_else(|| ServerError::unauthenticated("malformed token payload"))?;

        let issued_bytes: [u8; 8] = rest
            .try_into()
            .map_err(|_| ServerError::unauthenticated("malformed token payload"))?;

        Ok(TokenClaims {
            username,
            device_id,
            issued_at: u64::from_be_bytes(issued_bytes),
        })
    }

    /// Signs data with HMAC-SHA256.
    fn sign(&self, data: &[u8]) -> [u8; 32] {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }
}

/// Reads one length-prefixed UTF-8 string, returning it and the remainder.
fn read_string(bytes: &[u8]) -> Option<(String, &[u8])> {
    if bytes.len() < 2 {
        return None;
    }
    let len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
    let rest = &bytes[2..];
    if rest.len() < len {
        return None;
    }
    let text = std::str::from_utf8(&rest[..len]).ok()?;
    Some((text.to_string(), &rest[len..]))
}
