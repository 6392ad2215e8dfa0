//! Signed session token codec.
//!
//! Tokens are HS256 JWTs carrying the subject id, the role and the validity
//! window. Decoding fails closed: any outcome other than `Ok` means "no
//! session" to every caller; the three error variants exist only so the
//! session layer can log why a stored token was dropped.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use largify_core::UserId;

use crate::roles::Role;
use crate::user::User;

/// Default token lifetime, mirrored by the persisted cookie's max-age.
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the directory user id.
    pub sub: UserId,
    /// Role at issue time. Embedded so route gating needs no directory read;
    /// a role change takes effect at the next login.
    pub role: Role,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

impl TokenClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not a decodable token at all (structure, base64, claims shape).
    #[error("token is malformed")]
    Malformed,

    /// Valid signature, expired validity window.
    #[error("token has expired")]
    Expired,

    /// Signature does not verify against the codec's key.
    #[error("token signature does not verify")]
    Tampered,
}

/// Encodes and verifies session tokens with a single symmetric key.
///
/// Purely functional request/response contract: no persistence, no clock
/// ownership beyond expiry validation at decode time.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Codec with the default 7-day lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::days(DEFAULT_TTL_DAYS))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; a token one second past `exp` is already dead.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Lifetime of issued tokens (also the cookie max-age).
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user`, valid from `now` until `now + ttl`.
    ///
    /// Deterministic: the same user and instant always produce the same
    /// token string.
    pub fn encode(&self, user: &User, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims {
            sub: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Malformed)
    }

    /// Verify and decode a token string.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::Tampered,
                _ => TokenError::Malformed,
            })
    }
}
