/// Principal resolution middleware
///
/// Runs after the identity middleware. Loads the stored user for the token
/// subject and inserts it as a [`Principal`] so downstream layers (the status
/// gate) and handlers can read it by type.
///
/// # Errors
///
/// - 401 if no identity was established upstream
/// - 404 if no user has been synced for the identity yet

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use visapass_shared::{
    auth::{identity::Identity, principal::Principal},
    models::user::User,
};

pub async fn resolve_principal(
    State(state): State<AppState>,
    identity: Identity,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    let user = User::find_by_auth_user_id(&state.db, &identity.auth_user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::debug!(user_id = %user.id, status = %user.status, "Principal resolved");
    req.extensions_mut().insert(Principal::new(user));

    Ok(next.run(req).await)
}
