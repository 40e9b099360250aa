/// User endpoints
///
/// # Endpoints
///
/// - `POST /users` - Create or re-sync the caller's user after sign-in
/// - `GET /users/me` - Current user
/// - `PATCH /users/me` - Profile completion

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::countries::resolve_country,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;
use visapass_shared::{
    auth::{identity::Identity, principal::Principal},
    models::user::{CreateUser, UpdateProfile, User},
};

/// Sync request sent by clients right after external authentication
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserRequest {
    /// External authentication identifier, must match the token subject
    #[validate(length(min = 1, max = 128, message = "firebaseUid must be 1-128 characters"))]
    pub firebase_uid: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: String,

    /// Optional ISO code of the passport country
    pub passport_country: Option<String>,
}

/// Profile completion request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: Option<String>,

    pub passport_country: Option<String>,
}

fn check_full_name(full_name: Option<&str>) -> ApiResult<()> {
    match full_name {
        Some(name) if name.trim().is_empty() => {
            Err(ApiError::invalid_field("fullName", "Full name must not be blank"))
        }
        _ => Ok(()),
    }
}

/// Create or sync the caller's user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Authorization: Bearer <identity token>
///
/// {
///   "firebaseUid": "abc123",
///   "email": "ada@example.com",
///   "fullName": "Ada Traveller",
///   "passportCountry": "GB"
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: `firebaseUid` differs from the token subject
/// - `409 Conflict`: Email already used by another user
/// - `422 Unprocessable Entity`: Validation failed or unknown passport country
pub async fn sync_user(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<SyncUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;
    check_full_name(Some(&req.full_name))?;

    if req.firebase_uid != identity.auth_user_id {
        tracing::warn!(
            auth_user_id = %identity.auth_user_id,
            "Sync payload identity does not match token subject"
        );
        return Err(ApiError::Forbidden(
            "firebaseUid does not match the authenticated identity".to_string(),
        ));
    }

    let passport_country = match req.passport_country.as_deref() {
        Some(code) => Some(resolve_country(&state.db, "passportCountry", code).await?),
        None => None,
    };

    let data = CreateUser {
        auth_user_id: req.firebase_uid,
        email: req.email,
        full_name: req.full_name,
        passport_country,
    };

    let synced = User::sync(&state.db, data).await?;
    let user = synced.user;

    if synced.created {
        tracing::info!(user_id = %user.id, status = %user.status, "User created");
        Ok((StatusCode::CREATED, Json(user)))
    } else {
        tracing::info!(user_id = %user.id, status = %user.status, "User synced");
        Ok((StatusCode::OK, Json(user)))
    }
}

/// Get the current user
pub async fn get_current_user(principal: Principal) -> Json<User> {
    Json(principal.into_user())
}

/// Complete or edit the current user's profile
///
/// A `PENDING` user moves to `PROFILE_COMPLETE` once both the full name and
/// the passport country are set.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed or unknown passport country
pub async fn update_current_user(
    State(state): State<AppState>,
    principal: Principal,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;
    check_full_name(req.full_name.as_deref())?;

    let passport_country = match req.passport_country.as_deref() {
        Some(code) => Some(resolve_country(&state.db, "passportCountry", code).await?),
        None => None,
    };

    let user = User::update_profile(
        &state.db,
        principal.user_id(),
        UpdateProfile {
            full_name: req.full_name,
            passport_country,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.status != principal.status() {
        tracing::info!(
            user_id = %user.id,
            from = %principal.status(),
            to = %user.status,
            "User status changed"
        );
    }

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_request_wire_format() {
        let req: SyncUserRequest = serde_json::from_str(
            r#"{"firebaseUid":"uid-1","email":"ada@example.com","fullName":"Ada"}"#,
        )
        .unwrap();

        assert_eq!(req.firebase_uid, "uid-1");
        assert!(req.passport_country.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_sync_request_validation() {
        let req = SyncUserRequest {
            firebase_uid: String::new(),
            email: "nope".to_string(),
            full_name: "Ada".to_string(),
            passport_country: None,
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("firebase_uid"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_blank_full_name_rejected() {
        assert!(check_full_name(Some("   ")).is_err());
        assert!(check_full_name(Some("Ada")).is_ok());
        assert!(check_full_name(None).is_ok());
    }

    #[test]
    fn test_update_request_validation() {
        assert!(UpdateProfileRequest::default().validate().is_ok());

        let req = UpdateProfileRequest {
            full_name: Some("x".repeat(201)),
            passport_country: None,
        };
        assert!(req.validate().is_err());
    }
}
