use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, AuthError};

/// Lifetime of an issued bearer token.
pub const TOKEN_TTL_HOURS: i64 = 12;

/// Hash a password with Argon2id and a fresh random salt.
///
/// The same plaintext yields a different PHC string on every call; any of them
/// verifies with [`verify_password`].
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a stored PHC hash.
///
/// A malformed stored hash is reported as `InvalidCredentials` too, so the caller
/// cannot tell a corrupt row from a wrong password.
pub fn verify_password(plain: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Claims
///
/// Payload of a bearer token. `id` is the owner's numeric user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    /// Issued At (iat), seconds since the epoch.
    pub iat: usize,
    /// Expiration Time (exp), seconds since the epoch.
    pub exp: usize,
}

/// CredentialService
///
/// Issues and verifies HS256 bearer tokens with the process-wide secret. Built once
/// at startup and shared read-only through `AppState`.
#[derive(Clone)]
pub struct CredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl CredentialService {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue_token(&self, owner_id: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            id: owner_id,
            iat: now.timestamp().max(0) as usize,
            exp: (now + self.ttl).timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Shared handle used in `AppState`.
pub type CredentialState = Arc<CredentialService>;

/// AuthUser
///
/// The verified identity of the caller, threaded explicitly into every
/// authenticated handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

impl From<&Claims> for AuthUser {
    fn from(claims: &Claims) -> Self {
        AuthUser { id: claims.id }
    }
}

/// Reads the claims placed in the request extensions by [`require_bearer_token`].
///
/// Rejection: 401 when no verified identity is present.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .map(AuthUser::from)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// require_bearer_token
///
/// Boundary middleware for the authenticated router. Verifies the bearer token
/// before any handler runs and stores the resulting `Claims` in the request
/// extensions. Missing, malformed, tampered and expired tokens all yield 401.
pub async fn require_bearer_token(
    State(credentials): State<CredentialState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let Some(token) = bearer_token(&parts) else {
        tracing::debug!("request rejected: missing bearer token");
        return ApiError::unauthorized().into_response();
    };

    match credentials.verify_token(token) {
        Ok(claims) => {
            parts.extensions.insert(claims);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => {
            tracing::debug!("request rejected: {}", e);
            ApiError::unauthorized().into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();

        assert_ne!(first, "secret");
        assert_ne!(first, second);
        assert!(verify_password("secret", &first).is_ok());
        assert!(verify_password("secret", &second).is_ok());
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let hash = hash_password("secret").unwrap();
        assert!(matches!(
            verify_password("secreT", &hash),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_password("secret", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let service = CredentialService::new("unit-secret");
        let token = service.issue_token(42).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.exp - claims.iat, (TOKEN_TTL_HOURS * 3600) as usize);
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let issuer = CredentialService::new("secret-a");
        let verifier = CredentialService::new("secret-b");
        let token = issuer.issue_token(1).unwrap();

        assert!(matches!(
            verifier.verify_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = CredentialService::with_ttl("unit-secret", Duration::seconds(-60));
        let token = service.issue_token(1).unwrap();

        assert!(matches!(
            service.verify_token(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let service = CredentialService::new("unit-secret");
        assert!(matches!(
            service.verify_token("abc.def.ghi"),
            Err(AuthError::InvalidToken)
        ));
    }
}
