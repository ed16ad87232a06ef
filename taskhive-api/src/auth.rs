/// Bearer-token validation and the principal middleware
///
/// The API never issues tokens to end users; an external identity layer
/// does. This module validates what arrives, reconstructs the
/// [`Principal`] the core acts as, and inserts it into the request
/// extensions. Claims carry exactly what access decisions need: the user
/// id, the role, and the superuser flag. The core trusts these as-is and
/// never re-derives them.
///
/// Token minting is kept for tests and operational tooling.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 24 hours
/// - **Validation**: Signature, expiration, and issuer checks

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskhive_core::access::Principal;
use taskhive_core::models::user::UserRole;

use crate::app::AppState;
use crate::error::ApiError;

/// Token issuer, checked on validation
pub const ISSUER: &str = "taskhive";

/// Access-token lifetime
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials were supplied
    #[error("Missing authorization header")]
    MissingCredentials,

    /// The header is present but not a bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, issuer, or shape is wrong
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Failed to create a token
    #[error("Failed to create token: {0}")]
    CreateError(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::Expired => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken(_) => ApiError::Unauthorized(err.to_string()),
            AuthError::CreateError(msg) => ApiError::Internal(msg),
        }
    }
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "taskhive")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
///
/// # Custom Claims
///
/// - `role`: Platform role (admin or member)
/// - `su`: Superuser flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "taskhive"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Platform role (custom claim)
    pub role: UserRole,

    /// Superuser flag (custom claim)
    pub su: bool,
}

impl Claims {
    /// Creates claims for a principal with the default expiration.
    pub fn new(principal: &Principal) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            sub: principal.user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            role: principal.role,
            su: principal.is_superuser,
        }
    }

    /// Reconstructs the principal these claims describe.
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.sub,
            role: self.role,
            is_superuser: self.su,
        }
    }
}

/// Signs a token for the given claims.
///
/// # Errors
///
/// Returns [`AuthError::CreateError`] if signing fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::CreateError(e.to_string()))
}

/// Validates a token and returns its claims.
///
/// # Errors
///
/// Returns [`AuthError::Expired`] for expired tokens and
/// [`AuthError::InvalidToken`] for everything else that fails the
/// signature, issuer, or shape checks.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::InvalidToken(err.to_string()),
    })
}

/// Principal-resolver middleware
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects the resulting [`Principal`] into the request extensions.
/// Handlers take it with `Extension(principal)`.
pub async fn require_principal(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(claims.principal());

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn principal() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role: UserRole::Member,
            is_superuser: false,
        }
    }

    #[test]
    fn test_token_roundtrip_preserves_principal() {
        let principal = principal();
        let token = create_token(&Claims::new(&principal), SECRET).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.principal(), principal);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_admin_flags_survive_the_roundtrip() {
        let admin = Principal {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
            is_superuser: true,
        };
        let token = create_token(&Claims::new(&admin), SECRET).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert!(claims.principal().is_platform_admin());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(&Claims::new(&principal()), SECRET).unwrap();

        let err = validate_token(&token, "another-secret-also-32-bytes-long!!").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut claims = Claims::new(&principal());
        claims.iat -= 100_000;
        claims.exp = Utc::now().timestamp() - 3600;
        let token = create_token(&claims, SECRET).unwrap();

        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let mut claims = Claims::new(&principal());
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
