/// Status-based access control
///
/// A [`StatusGate`] holds the set of user statuses allowed through a group of
/// routes. The gate reads the [`Principal`] placed in request extensions by
/// the principal middleware, so it must be layered inside it.
///
/// # Responses
///
/// - no principal: 401 `{"message": "Authenticated user context missing"}`
/// - status not allowed: 403 `{"message": "Action not allowed for current user status"}`
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::post, Router};
/// use visapass_shared::auth::status_gate::{require_status, StatusGate};
/// use visapass_shared::models::user::UserStatus;
///
/// async fn create_application() -> &'static str {
///     "created"
/// }
///
/// let gate = StatusGate::new([UserStatus::ProfileComplete, UserStatus::Active]);
/// let app: Router = Router::new()
///     .route("/applications", post(create_application))
///     .layer(middleware::from_fn_with_state(gate, require_status));
/// ```

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::principal::{Principal, MISSING_PRINCIPAL_MESSAGE};
use crate::models::user::UserStatus;

/// Message returned when the principal's status is not allowed
pub const DENIED_MESSAGE: &str = "Action not allowed for current user status";

/// Allow-list of user statuses for a route group
#[derive(Debug, Clone)]
pub struct StatusGate {
    allowed: Arc<HashSet<UserStatus>>,
}

impl StatusGate {
    /// Creates a gate allowing exactly the given statuses
    ///
    /// An empty list denies every principal.
    pub fn new(allowed: impl IntoIterator<Item = UserStatus>) -> Self {
        Self {
            allowed: Arc::new(allowed.into_iter().collect()),
        }
    }

    /// Whether a status passes the gate
    pub fn permits(&self, status: UserStatus) -> bool {
        self.allowed.contains(&status)
    }

    /// Checks a principal against the gate
    pub fn check(&self, principal: Option<&Principal>) -> Result<(), StatusGateRejection> {
        let principal = principal.ok_or(StatusGateRejection::MissingPrincipal)?;

        if self.permits(principal.status()) {
            Ok(())
        } else {
            Err(StatusGateRejection::Denied {
                user_id: principal.user_id(),
                status: principal.status(),
            })
        }
    }
}

/// Why the gate refused a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusGateRejection {
    #[error("{}", DENIED_MESSAGE)]
    Denied { user_id: Uuid, status: UserStatus },

    #[error("{}", MISSING_PRINCIPAL_MESSAGE)]
    MissingPrincipal,
}

impl IntoResponse for StatusGateRejection {
    fn into_response(self) -> Response {
        let status = match self {
            StatusGateRejection::Denied { .. } => StatusCode::FORBIDDEN,
            StatusGateRejection::MissingPrincipal => StatusCode::UNAUTHORIZED,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Middleware enforcing a [`StatusGate`]
///
/// The wrapped handler only runs when the principal's status is allowed.
pub async fn require_status(
    State(gate): State<StatusGate>,
    req: Request,
    next: Next,
) -> Response {
    let verdict = gate.check(req.extensions().get::<Principal>());

    match verdict {
        Ok(()) => next.run(req).await,
        Err(rejection) => {
            match &rejection {
                StatusGateRejection::Denied { user_id, status } => {
                    tracing::warn!(%user_id, %status, path = %req.uri().path(), "Status gate denied request");
                }
                StatusGateRejection::MissingPrincipal => {
                    tracing::error!(path = %req.uri().path(), "Status gate reached without a principal");
                }
            }
            rejection.into_response()
        }
    }
}
