/// Identity middleware for Axum
///
/// Validates the `Authorization: Bearer <token>` header and adds the caller's
/// [`Identity`] to the request extensions. Identity only says who the caller
/// is according to the authentication provider; it does not require a stored
/// user (see [`super::principal`] for that).
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::post, Router};
/// use visapass_shared::auth::identity::{identity_middleware, Identity, TokenVerifier};
///
/// async fn handler(identity: Identity) -> String {
///     format!("Hello, {}!", identity.email)
/// }
///
/// let verifier = TokenVerifier::new("a-very-secret-key-of-at-least-32-bytes", "visapass");
/// let app: Router = Router::new()
///     .route("/users", post(handler))
///     .layer(middleware::from_fn_with_state(verifier, identity_middleware));
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::jwt::{validate_token, Claims, JwtError};

/// Authenticated caller as asserted by the identity token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// External authentication identifier (token subject)
    pub auth_user_id: String,

    /// Email asserted by the identity provider
    pub email: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            auth_user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Validates identity tokens against a shared secret and issuer
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    secret: Arc<str>,
    issuer: Arc<str>,
}

impl TokenVerifier {
    pub fn new(secret: impl AsRef<str>, issuer: impl AsRef<str>) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
            issuer: Arc::from(issuer.as_ref()),
        }
    }

    /// Validates a raw token and returns the identity it carries
    pub fn verify(&self, token: &str) -> Result<Identity, JwtError> {
        validate_token(token, &self.secret, &self.issuer).map(Identity::from)
    }
}

/// Error type for the identity middleware
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::MissingCredentials => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AuthError::InvalidFormat(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
        };

        let body = Json(json!({ "error": code, "message": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Validates the bearer token and inserts the caller's [`Identity`]
///
/// # Errors
///
/// - 401 if the header is missing or the token is invalid or expired
/// - 400 if the header does not use the Bearer scheme
pub async fn identity_middleware(
    State(verifier): State<TokenVerifier>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = verifier.verify(bearer_token(req.headers())?)?;

    tracing::debug!(auth_user_id = %identity.auth_user_id, "Identity verified");
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, DEFAULT_ISSUER};
    use axum::{
        body::Body,
        http::{HeaderValue, Request},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn app() -> Router {
        Router::new()
            .route("/", get(|identity: Identity| async move { identity.auth_user_id }))
            .layer(middleware::from_fn_with_state(
                TokenVerifier::new(SECRET, DEFAULT_ISSUER),
                identity_middleware,
            ))
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingCredentials));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidFormat(_))));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Ok("abc.def"));
    }

    #[test]
    fn test_auth_error_into_response() {
        assert_eq!(
            AuthError::MissingCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidFormat("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::from(JwtError::Expired),
            AuthError::InvalidToken("Token expired".to_string())
        );
    }

    #[tokio::test]
    async fn test_valid_token_inserts_identity() {
        let token = create_token(&Claims::new("uid-7", "u7@example.com", DEFAULT_ISSUER), SECRET)
            .unwrap();

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"uid-7");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
