/// Country endpoints
///
/// # Endpoints
///
/// - `GET /countries` - All countries ordered by name
/// - `GET /countries/:iso_code` - Single country (code is case-insensitive)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;
use visapass_shared::models::country::{normalize_iso_code, Country};

/// List all countries
pub async fn list_countries(State(state): State<AppState>) -> ApiResult<Json<Vec<Country>>> {
    Ok(Json(Country::list(&state.db).await?))
}

/// Get a country by ISO code
///
/// # Errors
///
/// - `404 Not Found`: No country with that code
pub async fn get_country(
    State(state): State<AppState>,
    Path(iso_code): Path<String>,
) -> ApiResult<Json<Country>> {
    Country::find_by_iso_code(&state.db, &iso_code)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Country not found".to_string()))
}

/// Resolves a country reference from a request body
///
/// Returns the normalised ISO code, or a 422 on `field` when the code is
/// malformed or no such country exists.
pub(crate) async fn resolve_country(pool: &PgPool, field: &str, input: &str) -> ApiResult<String> {
    let code = normalize_iso_code(input)
        .ok_or_else(|| ApiError::invalid_field(field, "Must be a two-letter ISO country code"))?;

    if !Country::exists(pool, &code).await? {
        return Err(ApiError::invalid_field(field, "Unknown country"));
    }

    Ok(code)
}
