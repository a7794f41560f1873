/**
 * Account Tokens
 *
 * One-time tokens for the activation and password reset links.
 *
 * A token is `{timestamp_base36}-{signature}` where the signature is an
 * HMAC-SHA256 over the purpose, the account id, a fingerprint of the
 * account state and the timestamp. Nothing is stored server side; a token
 * stops verifying as soon as the fingerprinted state changes:
 *
 * - Activation fingerprints `is_active` and `email`, so the link dies once
 *   the account is active.
 * - Password reset fingerprints the password hash and `last_login`, so the
 *   link dies once the password is changed (or the user logs in).
 *
 * Tokens also expire after the configured lifetime.
 */

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::backend::auth::users::Account;

type HmacSha256 = Hmac<Sha256>;

/// Account token errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountTokenError {
    #[error("invalid signing key")]
    InvalidKey,
    #[error("invalid uid")]
    InvalidUid,
}

/// What a token authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Activation,
    PasswordReset,
}

impl TokenPurpose {
    fn as_str(self) -> &'static str {
        match self {
            TokenPurpose::Activation => "activation",
            TokenPurpose::PasswordReset => "password-reset",
        }
    }

    fn fingerprint(self, account: &Account) -> String {
        match self {
            TokenPurpose::Activation => format!("{}|{}", account.is_active, account.email),
            TokenPurpose::PasswordReset => format!(
                "{}|{}",
                account.password_hash,
                account
                    .last_login
                    .map(|at| at.timestamp().to_string())
                    .unwrap_or_default()
            ),
        }
    }
}

/// Signs and verifies account tokens
#[derive(Clone)]
pub struct AccountTokenGenerator {
    mac: HmacSha256,
    ttl: Duration,
}

impl AccountTokenGenerator {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AccountTokenError> {
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| AccountTokenError::InvalidKey)?;
        Ok(Self { mac, ttl })
    }

    /// Create a token for `account` valid from now
    pub fn make_token(&self, purpose: TokenPurpose, account: &Account) -> String {
        self.make_token_at(purpose, account, unix_now())
    }

    /// Check a token against the account's current state
    pub fn check_token(&self, purpose: TokenPurpose, account: &Account, token: &str) -> bool {
        self.check_token_at(purpose, account, token, unix_now())
    }

    fn make_token_at(&self, purpose: TokenPurpose, account: &Account, timestamp: u64) -> String {
        let signature = self.sign(purpose, account, timestamp).finalize().into_bytes();
        format!("{}-{}", to_base36(timestamp), URL_SAFE_NO_PAD.encode(signature))
    }

    fn check_token_at(&self, purpose: TokenPurpose, account: &Account, token: &str, now: u64) -> bool {
        // base36 never contains '-', the signature alphabet may
        let Some((ts_part, sig_part)) = token.split_once('-') else {
            return false;
        };
        let Some(timestamp) = from_base36(ts_part) else {
            return false;
        };
        let Ok(signature) = URL_SAFE_NO_PAD.decode(sig_part) else {
            return false;
        };

        if timestamp > now || now - timestamp > self.ttl.as_secs() {
            return false;
        }

        self.sign(purpose, account, timestamp).verify_slice(&signature).is_ok()
    }

    fn sign(&self, purpose: TokenPurpose, account: &Account, timestamp: u64) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(
            format!(
                "{}:{}:{}:{}",
                purpose.as_str(),
                account.id,
                purpose.fingerprint(account),
                timestamp
            )
            .as_bytes(),
        );
        mac
    }
}

/// Encode an account id for use in a link
pub fn encode_uid(id: i64) -> String {
    URL_SAFE_NO_PAD.encode(id.to_string())
}

/// Decode a uid produced by `encode_uid`
pub fn decode_uid(uid: &str) -> Result<i64, AccountTokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(uid)
        .map_err(|_| AccountTokenError::InvalidUid)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| AccountTokenError::InvalidUid)?;
    match text.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AccountTokenError::InvalidUid),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(text: &str) -> Option<u64> {
    if text.is_empty() || text.len() > 13 {
        return None;
    }
    u64::from_str_radix(text, 36).ok()
}
