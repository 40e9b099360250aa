/// Visa application model and database operations
///
/// Applications belong to a user and name a destination country. Creating
/// and listing them sits behind the status gate in the API.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE application_status AS ENUM ('DRAFT', 'SUBMITTED');
///
/// CREATE TABLE visa_applications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     destination_country VARCHAR(2) NOT NULL REFERENCES countries (iso_code),
///     purpose VARCHAR(500) NOT NULL,
///     status application_status NOT NULL DEFAULT 'DRAFT',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Application lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
}

/// Visa application record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VisaApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination_country: String,
    pub purpose: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVisaApplication {
    pub user_id: Uuid,

    /// Normalised ISO code of an existing country
    pub destination_country: String,

    pub purpose: String,

    /// Submit immediately instead of saving a draft
    pub submit: bool,
}

impl VisaApplication {
    /// Creates an application for a user
    pub async fn create(pool: &PgPool, data: CreateVisaApplication) -> Result<Self, sqlx::Error> {
        let status = if data.submit {
            ApplicationStatus::Submitted
        } else {
            ApplicationStatus::Draft
        };

        sqlx::query_as::<_, VisaApplication>(
            r#"
            INSERT INTO visa_applications (user_id, destination_country, purpose, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, destination_country, purpose, status, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.destination_country)
        .bind(data.purpose.trim())
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Lists a user's applications, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, VisaApplication>(
            r#"
            SELECT id, user_id, destination_country, purpose, status, created_at, updated_at
            FROM visa_applications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
