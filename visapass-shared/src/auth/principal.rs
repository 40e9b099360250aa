/// The authenticated principal for a request
///
/// A [`Principal`] is the stored [`User`] resolved for the caller's identity.
/// It is inserted into request extensions by the API's principal middleware
/// and read back by type, either through the extractor below or by the
/// status gate. Handlers never look users up from ambient request state.
///
/// # Example
///
/// ```no_run
/// use axum::Json;
/// use visapass_shared::auth::principal::Principal;
/// use visapass_shared::models::user::User;
///
/// async fn me(principal: Principal) -> Json<User> {
///     Json(principal.into_user())
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::models::user::{User, UserStatus};

/// Message returned when a route expecting a principal runs without one
pub const MISSING_PRINCIPAL_MESSAGE: &str = "Authenticated user context missing";

/// Stored user resolved for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user: User,
}

impl Principal {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn status(&self) -> UserStatus {
        self.user.status
    }

    pub fn into_user(self) -> User {
        self.user
    }
}

/// Rejection used when no principal was resolved upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", MISSING_PRINCIPAL_MESSAGE)]
pub struct MissingPrincipal;

impl IntoResponse for MissingPrincipal {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": MISSING_PRINCIPAL_MESSAGE })),
        )
            .into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = MissingPrincipal;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(MissingPrincipal)
    }
}
