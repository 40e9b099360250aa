/// Identity token generation and validation
///
/// Clients authenticate with an external provider and present the resulting
/// identity as an HS256-signed JWT. The subject is the provider's user
/// identifier, which is also the stable key of the stored user.
///
/// # Claims
///
/// - `sub`: external authentication identifier
/// - `email`: email address asserted by the provider
/// - `iss`: issuer (configurable, default `visapass`)
/// - `iat` / `nbf` / `exp`: Unix timestamps
///
/// # Example
///
/// ```
/// use visapass_shared::auth::jwt::{create_token, validate_token, Claims, DEFAULT_ISSUER};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-very-secret-key-of-at-least-32-bytes";
/// let claims = Claims::new("firebase-uid-1", "ada@example.com", DEFAULT_ISSUER);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret, DEFAULT_ISSUER)?;
/// assert_eq!(validated.sub, "firebase-uid-1");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer used when none is configured
pub const DEFAULT_ISSUER: &str = "visapass";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Issuer doesn't match the configured one
    #[error("Invalid issuer, expected {expected}")]
    InvalidIssuer { expected: String },

    /// Token is missing a usable subject
    #[error("Token subject is empty")]
    EmptySubject,
}

/// Identity token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// External authentication identifier
    pub sub: String,

    /// Email asserted by the identity provider
    pub email: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Default token lifetime
    pub fn default_lifetime() -> Duration {
        Duration::hours(1)
    }

    /// Creates claims valid for the default lifetime
    pub fn new(auth_user_id: impl Into<String>, email: impl Into<String>, issuer: &str) -> Self {
        Self::with_expiration(auth_user_id, email, issuer, Self::default_lifetime())
    }

    /// Creates claims with a custom lifetime (negative values produce expired claims)
    pub fn with_expiration(
        auth_user_id: impl Into<String>,
        email: impl Into<String>,
        issuer: &str,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: auth_user_id.into(),
            email: email.into(),
            iss: issuer.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and returns its claims
///
/// Checks the signature, `exp`, `nbf` and the issuer. A blank subject is
/// rejected because it cannot key a user record.
pub fn validate_token(token: &str, secret: &str, issuer: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: issuer.to_string(),
        },
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(JwtError::EmptySubject);
    }

    Ok(token_data.claims)
}
