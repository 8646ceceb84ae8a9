//! JWT token generation and verification.
//!
//! Tokens are compact HS256 JWTs (`header.payload.signature`, base64url), so
//! any standard JWT library holding the same secret can verify them.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use uuid::Uuid;

use super::{AuthError, TokenError};
use crate::models::account::Role;
use crate::models::auth::TokenClaims;

/// Value of the `iss` claim on every token this service issues.
pub const TOKEN_ISSUER: &str = "gatehouse-api";

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Only the field we need to reject algorithm confusion before verifying.
#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

/// Signing material plus token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenKeys {
    /// Build keys from a shared secret. An empty secret is a configuration error.
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Configuration(
                "token signing secret must not be empty".into(),
            ));
        }
        if lifetime <= Duration::zero() {
            return Err(AuthError::Configuration(
                "token lifetime must be positive".into(),
            ));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a signed token for the account, valid from now for the configured lifetime.
    pub fn issue(&self, account_id: Uuid, email: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(account_id, email, role, Utc::now())
    }

    /// Issue a token as if the clock read `now`.
    pub fn issue_at(
        &self,
        account_id: Uuid,
        email: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims {
            account_id: account_id.to_string(),
            email: email.to_string(),
            role,
            issued_at: now.timestamp(),
            expires_at: (now + self.lifetime).timestamp(),
            issuer: TOKEN_ISSUER.to_string(),
        };
        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify signature, algorithm, issuer and expiry; return the claims.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        check_structure(token)?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        let claims = decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        // Strictly before expiry; the library accepts exp == now.
        if claims.expires_at <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

/// Reject tokens that are not three segments, whose header does not name
/// HS256, or whose signature segment is not valid base64url.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };
    if header.is_empty() || payload.is_empty() {
        return Err(TokenError::Malformed);
    }

    let raw = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;
    if header.alg.as_deref() != Some("HS256") {
        return Err(TokenError::AlgorithmMismatch);
    }

    if signature.is_empty() || URL_SAFE_NO_PAD.decode(signature).is_err() {
        return Err(TokenError::SignatureInvalid);
    }
    Ok(())
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::AlgorithmMismatch
        }
        _ => TokenError::Malformed,
    }
}

/// Issue a token with the default 24 hour lifetime.
pub fn issue_token(
    account_id: Uuid,
    email: &str,
    role: Role,
    secret: &[u8],
) -> Result<String, AuthError> {
    TokenKeys::new(secret, Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS))?
        .issue(account_id, email, role)
}

/// Validate a token against a shared secret.
pub fn validate_token(token: &str, secret: &[u8]) -> Result<TokenClaims, AuthError> {
    let keys = TokenKeys::new(secret, Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS))?;
    Ok(keys.validate(token)?)
}
