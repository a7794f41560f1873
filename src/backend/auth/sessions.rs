/**
 * Session Management and JWT Tokens
 *
 * This module issues and verifies the access/refresh token pair.
 *
 * Both tokens are HS256 JWTs carrying the account id in `sub`, a
 * `token_type` discriminator and a unique `jti`. Access tokens authenticate
 * requests; refresh tokens mint new access tokens and can be revoked by
 * adding their `jti` to the blacklist (see `blacklist.rs`).
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Which of the pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Username at issue time
    pub username: String,
    pub token_type: TokenType,
    /// Unique token id, the blacklist key
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    pub fn account_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Session token errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("expected {expected:?} token, got {found:?}")]
    WrongType { expected: TokenType, found: TokenType },

    #[error("token lifetime of {0:?} overflows the expiry timestamp")]
    LifetimeOverflow(Duration),
}

/// A freshly issued token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Signing keys and lifetimes for session tokens
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a refresh/access pair for an account
    pub fn issue_pair(&self, account_id: i64, username: &str) -> Result<TokenPair, SessionError> {
        let refresh = self.sign(TokenType::Refresh, account_id.to_string(), username.to_string())?;
        let access = self.sign(TokenType::Access, account_id.to_string(), username.to_string())?;
        Ok(TokenPair { refresh, access })
    }

    /// Issue a new access token for the subject of a verified refresh token
    pub fn access_from_refresh(&self, refresh: &Claims) -> Result<String, SessionError> {
        self.sign(TokenType::Access, refresh.sub.clone(), refresh.username.clone())
    }

    /// Verify signature, expiry and type of a token
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, SessionError> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())?.claims;
        if claims.token_type != expected {
            return Err(SessionError::WrongType {
                expected,
                found: claims.token_type,
            });
        }
        Ok(claims)
    }

    fn sign(&self, token_type: TokenType, sub: String, username: String) -> Result<String, SessionError> {
        let now = unix_now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };

        let exp = now
            .checked_add(ttl.as_secs())
            .ok_or(SessionError::LifetimeOverflow(ttl))?;

        let claims = Claims {
            sub,
            username,
            token_type,
            jti: uuid::Uuid::new_v4().simple().to_string(),
            exp,
            iat: now,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn keys() -> SessionKeys {
        SessionKeys::new("test-secret", Duration::from_secs(300), Duration::from_secs(86400))
    }

    #[test]
    fn test_issue_pair() {
        let pair = keys().issue_pair(1, "alice").unwrap();
        assert!(!pair.access.is_empty());
        assert_ne!(pair.access, pair.refresh);

        let access = keys().verify(&pair.access, TokenType::Access).unwrap();
        let refresh = keys().verify(&pair.refresh, TokenType::Refresh).unwrap();
        assert_eq!(access.account_id(), Some(1));
        assert_eq!(refresh.username, "alice");
        assert_ne!(access.jti, refresh.jti);
        assert_eq!(refresh.exp - refresh.iat, 86400);
        assert_eq!(access.exp - access.iat, 300);
    }

    #[test]
    fn test_lifetime_overflow_is_an_error() {
        let keys = SessionKeys::new("test-secret", Duration::from_secs(u64::MAX), Duration::from_secs(60));
        assert_matches!(
            keys.issue_pair(1, "alice"),
            Err(SessionError::LifetimeOverflow(_))
        );
    }

    #[test]
    fn test_types_are_not_interchangeable() {
        let pair = keys().issue_pair(1, "alice").unwrap();
        assert_matches!(
            keys().verify(&pair.access, TokenType::Refresh),
            Err(SessionError::WrongType { expected: TokenType::Refresh, found: TokenType::Access })
        );
        assert_matches!(
            keys().verify(&pair.refresh, TokenType::Access),
            Err(SessionError::WrongType { .. })
        );
    }

    #[test]
    fn test_access_from_refresh() {
        let pair = keys().issue_pair(3, "carol").unwrap();
        let refresh = keys().verify(&pair.refresh, TokenType::Refresh).unwrap();
        let access = keys().access_from_refresh(&refresh).unwrap();

        let claims = keys().verify(&access, TokenType::Access).unwrap();
        assert_eq!(claims.sub, "3");
        assert_eq!(claims.username, "carol");
    }

    #[test]
    fn test_verify_invalid_token() {
        assert_matches!(keys().verify("invalid.token.here", TokenType::Access), Err(SessionError::Jwt(_)));

        let other = SessionKeys::new("other", Duration::from_secs(300), Duration::from_secs(300));
        let pair = other.issue_pair(1, "alice").unwrap();
        assert!(keys().verify(&pair.access, TokenType::Access).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = keys();
        let claims = Claims {
            sub: "1".to_string(),
            username: "alice".to_string(),
            token_type: TokenType::Access,
            jti: "x".to_string(),
            exp: 1_000,
            iat: 900,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token, TokenType::Access).is_err());
    }
}
