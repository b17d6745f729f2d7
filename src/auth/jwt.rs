use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use anyhow::Context;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::Claims,
    config::{JwtConfig, MAX_TOKEN_TTL_MINUTES},
};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a presented token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("missing Authorization header")]
    Missing,
    #[error("invalid auth scheme")]
    InvalidScheme,
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("unexpected token algorithm")]
    WrongAlgorithm,
    #[error("invalid token claims")]
    InvalidClaims,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::WrongAlgorithm
            }
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims,
            _ => TokenError::Malformed,
        }
    }
}

/// Signing and verification keys, built once from config at startup.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            (1..=MAX_TOKEN_TTL_MINUTES).contains(&cfg.ttl_minutes),
            "token ttl must be between 1 and {MAX_TOKEN_TTL_MINUTES} minutes, got {}",
            cfg.ttl_minutes
        );
        let ttl_secs = u64::try_from(cfg.ttl_minutes)
            .ok()
            .and_then(|m| m.checked_mul(60))
            .context("token ttl overflows")?;
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs(ttl_secs),
        })
    }

    pub fn generate_token(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = i64::try_from(self.ttl.as_secs())
            .ok()
            .map(TimeDuration::seconds)
            .context("token ttl overflows")?;
        let exp = now.checked_add(ttl).context("token expiry out of range")?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation
    }

    /// Verifies a bare token and returns its subject id.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation())?;
        let user_id = data.claims.user_id().ok_or(TokenError::InvalidClaims)?;
        debug!(user_id, "jwt verified");
        Ok(user_id)
    }

    /// Validates a raw `Authorization` header value (`Bearer <token>`).
    pub fn validate_token(&self, raw_header: Option<&str>) -> Result<i64, TokenError> {
        let raw = raw_header
            .map(str::trim_start)
            .filter(|v| !v.trim_end().is_empty())
            .ok_or(TokenError::Missing)?;
        let token = strip_bearer(raw).ok_or(TokenError::InvalidScheme)?.trim();
        if token.is_empty() {
            return Err(TokenError::Malformed);
        }
        self.verify(token)
    }
}

fn strip_bearer(raw: &str) -> Option<&str> {
    const SCHEME: &str = "bearer ";
    raw.get(..SCHEME.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(SCHEME))
        .map(|_| &raw[SCHEME.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        })
        .unwrap()
    }

    fn claims_for(keys: &JwtKeys, sub: &str, exp_offset_secs: i64) -> Claims {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Claims {
            sub: sub.into(),
            iat: now as usize,
            exp: (now + exp_offset_secs) as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        }
    }

    #[test]
    fn generate_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys.generate_token(17).expect("sign");
        assert_eq!(keys.verify(&token), Ok(17));
        assert_eq!(keys.validate_token(Some(&format!("Bearer {token}"))), Ok(17));
        assert_eq!(keys.validate_token(Some(&format!("bearer {token}"))), Ok(17));
    }

    #[test]
    fn header_problems_are_reported_before_decoding() {
        let keys = make_keys("dev-secret");
        let token = keys.generate_token(1).unwrap();
        assert_eq!(keys.validate_token(None), Err(TokenError::Missing));
        assert_eq!(keys.validate_token(Some("   ")), Err(TokenError::Missing));
        assert_eq!(keys.validate_token(Some(&token)), Err(TokenError::InvalidScheme));
        assert_eq!(
            keys.validate_token(Some(&format!("Basic {token}"))),
            Err(TokenError::InvalidScheme)
        );
        assert_eq!(keys.validate_token(Some("Bearer    ")), Err(TokenError::Malformed));
        assert_eq!(keys.validate_token(Some("Bearer not.a.jwt")), Err(TokenError::Malformed));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = make_keys("dev-secret");
        let claims = claims_for(&keys, "5", -3600);
        let token = encode(&Header::new(ALGORITHM), &claims, &keys.encoding).unwrap();
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let ours = make_keys("secret-one");
        let theirs = make_keys("secret-two");
        let token = theirs.generate_token(5).unwrap();
        assert_eq!(ours.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn other_algorithm_is_rejected_even_with_the_right_secret() {
        let keys = make_keys("dev-secret");
        let claims = claims_for(&keys, "5", 600);
        let token = encode(&Header::new(Algorithm::HS384), &claims, &keys.encoding).unwrap();
        assert_eq!(keys.verify(&token), Err(TokenError::WrongAlgorithm));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let keys = make_keys("dev-secret");
        let mut claims = claims_for(&keys, "5", 600);
        claims.aud = "someone-else".into();
        let token = encode(&Header::new(ALGORITHM), &claims, &keys.encoding).unwrap();
        assert_eq!(keys.verify(&token), Err(TokenError::InvalidClaims));
    }

    #[test]
    fn non_numeric_subject_fails_closed() {
        let keys = make_keys("dev-secret");
        let claims = claims_for(&keys, "admin", 600);
        let token = encode(&Header::new(ALGORITHM), &claims, &keys.encoding).unwrap();
        assert_eq!(keys.verify(&token), Err(TokenError::InvalidClaims));
    }

    #[test]
    fn ttl_comes_from_config() {
        let keys = make_keys("dev-secret");
        assert_eq!(keys.ttl, Duration::from_secs(5 * 60));
    }

    #[test]
    fn out_of_range_ttl_is_an_error_not_a_panic() {
        let cfg = |ttl_minutes| JwtConfig {
            secret: "dev-secret".into(),
            issuer: "i".into(),
            audience: "a".into(),
            ttl_minutes,
        };
        assert!(JwtKeys::new(&cfg(i64::MAX)).is_err());
        assert!(JwtKeys::new(&cfg(10_000_000_000)).is_err());
        assert!(JwtKeys::new(&cfg(0)).is_err());
        assert!(JwtKeys::new(&cfg(-5)).is_err());
        assert!(JwtKeys::new(&cfg(MAX_TOKEN_TTL_MINUTES)).is_ok());
    }

    #[test]
    fn expiry_past_the_calendar_is_an_error_not_a_panic() {
        let mut keys = make_keys("dev-secret");
        keys.ttl = Duration::from_secs(u64::MAX);
        assert!(keys.generate_token(1).is_err());
        keys.ttl = Duration::from_secs(10_000_000_000 * 60);
        assert!(keys.generate_token(1).is_err());
    }
}
