/// Visa application endpoints
///
/// Both routes sit behind the status gate: only `PROFILE_COMPLETE` and
/// `ACTIVE` users reach these handlers.
///
/// # Endpoints
///
/// - `POST /applications` - Create an application for the current user
/// - `GET /applications` - List the current user's applications

use crate::{
    app::AppState,
    error::ApiResult,
    routes::countries::resolve_country,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;
use visapass_shared::{
    auth::principal::Principal,
    models::visa_application::{CreateVisaApplication, VisaApplication},
};

/// Create application request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    /// ISO code of the destination country
    pub destination_country: String,

    #[validate(length(min = 1, max = 500, message = "Purpose must be 1-500 characters"))]
    pub purpose: String,

    /// Submit right away instead of saving a draft
    #[serde(default)]
    pub submit: bool,
}

/// Create a visa application
///
/// # Errors
///
/// - `403 Forbidden`: Status not allowed (from the status gate)
/// - `422 Unprocessable Entity`: Validation failed or unknown destination
pub async fn create_application(
    State(state): State<AppState>,
    principal: Principal,
    Json(req): Json<CreateApplicationRequest>,
) -> ApiResult<(StatusCode, Json<VisaApplication>)> {
    req.validate()?;

    let destination_country =
        resolve_country(&state.db, "destinationCountry", &req.destination_country).await?;

    let application = VisaApplication::create(
        &state.db,
        CreateVisaApplication {
            user_id: principal.user_id(),
            destination_country,
            purpose: req.purpose,
            submit: req.submit,
        },
    )
    .await?;

    tracing::info!(
        user_id = %principal.user_id(),
        application_id = %application.id,
        "Visa application created"
    );

    Ok((StatusCode::CREATED, Json(application)))
}

/// List the current user's visa applications
pub async fn list_applications(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<VisaApplication>>> {
    Ok(Json(
        VisaApplication::list_by_user(&state.db, principal.user_id()).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_defaults_to_draft() {
        let req: CreateApplicationRequest =
            serde_json::from_str(r#"{"destinationCountry":"jp","purpose":"Tourism"}"#).unwrap();

        assert!(!req.submit);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_purpose_rejected() {
        let req: CreateApplicationRequest =
            serde_json::from_str(r#"{"destinationCountry":"JP","purpose":""}"#).unwrap();

        assert!(req.validate().is_err());
    }
}
