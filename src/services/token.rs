//! Token issuer - Signs and verifies access/refresh JWT pairs.
//!
//! Both tokens are HS256. Access tokens carry the subject; refresh tokens
//! only carry expiry and a random `jti`, the owner is resolved through the
//! refresh-token store.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{BEARER_TOKEN_PREFIX, MIN_BEARER_HEADER_LENGTH};

/// Token signing and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("invalid token lifetime {value:?}: {reason}")]
    InvalidTtl { value: String, reason: String },

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Expired and malformed tokens are the caller's fault; the rest are ours.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TokenError::Expired | TokenError::Malformed)
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Refresh token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued access/refresh pair
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Issues and verifies token pairs with a shared HMAC secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Build an issuer from a secret and two humantime TTL expressions
    /// (`"15m"`, `"720h"`, `"1h 30m"`).
    pub fn new(secret: &[u8], access_ttl: &str, refresh_ttl: &str) -> Result<Self, TokenError> {
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: parse_ttl(access_ttl)?,
            refresh_ttl: parse_ttl(refresh_ttl)?,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Sign a new access/refresh pair for `subject`.
    pub fn issue_pair(&self, subject: Uuid) -> Result<TokenPair, TokenError> {
        let now = Utc::now();

        let access = AccessClaims {
            sub: subject,
            iat: now.timestamp(),
            exp: expires_at(now, self.access_ttl)?,
        };
        let refresh = RefreshClaims {
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at(now, self.refresh_ttl)?,
        };

        Ok(TokenPair {
            access: self.sign(&access)?,
            refresh: self.sign(&refresh)?,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.verify(token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.verify(token)
    }

    fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        // Pinning the algorithm rejects alg=none and any non-HS256 header.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(decode::<C>(token, &self.decoding, &validation)?.claims)
    }
}

fn parse_ttl(raw: &str) -> Result<Duration, TokenError> {
    let invalid = |reason: String| TokenError::InvalidTtl {
        value: raw.to_string(),
        reason,
    };

    let std_duration = humantime::parse_duration(raw).map_err(|e| invalid(e.to_string()))?;
    let ttl = Duration::from_std(std_duration).map_err(|e| invalid(e.to_string()))?;
    expires_at(Utc::now(), ttl)?;
    Ok(ttl)
}

/// `now + ttl` as a unix timestamp, failing instead of overflowing
fn expires_at(now: DateTime<Utc>, ttl: Duration) -> Result<i64, TokenError> {
    now.checked_add_signed(ttl)
        .map(|at| at.timestamp())
        .ok_or_else(|| TokenError::InvalidTtl {
            value: ttl.to_string(),
            reason: "expiry is out of range".to_string(),
        })
}

/// Strip the `Bearer ` prefix from an Authorization header value.
///
/// Values too short to hold a token, or without the prefix, come back
/// unchanged and fail verification upstream.
pub fn extract_bearer(header: &str) -> &str {
    if header.len() > MIN_BEARER_HEADER_LENGTH {
        header.strip_prefix(BEARER_TOKEN_PREFIX).unwrap_or(header)
    } else {
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, "15m", "720h").unwrap()
    }

    #[test]
    fn test_access_token_subject_and_expiry() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let before = Utc::now().timestamp();

        let pair = issuer.issue_pair(user_id).unwrap();
        let claims = issuer.verify_access(&pair.access).unwrap();

        assert_eq!(claims.sub, user_id);
        let expected = before + 15 * 60;
        assert!((claims.exp - expected).abs() <= 2, "exp drifted: {}", claims.exp - expected);
    }

    #[test]
    fn test_refresh_token_has_no_subject() {
        let issuer = issuer();
        let pair = issuer.issue_pair(Uuid::new_v4()).unwrap();

        let claims = issuer.verify_refresh(&pair.refresh).unwrap();
        assert!(claims.exp - claims.iat >= 720 * 3600 - 1);

        // A refresh token cannot stand in for an access token.
        assert_eq!(issuer.verify_access(&pair.refresh).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_refresh_tokens_are_unique_within_a_second() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let first = issuer.issue_pair(user_id).unwrap();
        let second = issuer.issue_pair(user_id).unwrap();
        assert_ne!(first.refresh, second.refresh);
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp();
        let claims = RefreshClaims {
            jti: Uuid::new_v4(),
            iat: now - 120,
            exp: now - 60,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(issuer().verify_refresh(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let other = TokenIssuer::new(b"another-secret-key-that-is-32-chars!!", "15m", "1h").unwrap();
        let pair = other.issue_pair(Uuid::new_v4()).unwrap();

        assert_eq!(issuer().verify_access(&pair.access).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_other_algorithms_rejected() {
        let claims = AccessClaims {
            sub: Uuid::new_v4(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(issuer().verify_access(&token).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert_eq!(issuer().verify_access("not.a.jwt").unwrap_err(), TokenError::Malformed);
        assert_eq!(issuer().verify_access("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let now = Utc::now();
        assert!(matches!(
            expires_at(now, Duration::days(365 * 1_000_000)),
            Err(TokenError::InvalidTtl { .. })
        ));
        assert_eq!(
            expires_at(now, Duration::minutes(15)).unwrap(),
            now.timestamp() + 900
        );
    }

    #[test]
    fn test_invalid_ttl() {
        assert!(matches!(
            TokenIssuer::new(SECRET, "forever", "720h"),
            Err(TokenError::InvalidTtl { .. })
        ));
        assert!(matches!(
            TokenIssuer::new(SECRET, "15m", "12 parsecs"),
            Err(TokenError::InvalidTtl { .. })
        ));

        assert!(matches!(
            TokenIssuer::new(SECRET, "1000000years", "720h"),
            Err(TokenError::InvalidTtl { .. })
        ));

        let issuer = TokenIssuer::new(SECRET, "1h 30m", "7days").unwrap();
        assert_eq!(issuer.access_ttl(), Duration::minutes(90));
        assert_eq!(issuer.refresh_ttl(), Duration::days(7));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(extract_bearer("Bearer x"), "Bearer x");
        assert_eq!(extract_bearer("Token abc.def.ghi"), "Token abc.def.ghi");
        assert_eq!(extract_bearer(""), "");
    }
}
