/// User model and database operations
///
/// A user is created by the sync call a client makes right after external
/// authentication, and is keyed by the identifier the authentication
/// provider issued (`auth_user_id`). The user's `status` drives both the
/// client-side route gate and the server-side status gate.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_status AS ENUM ('PENDING', 'PROFILE_COMPLETE', 'ACTIVE', 'SUSPENDED');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     auth_user_id VARCHAR(128) NOT NULL UNIQUE,
///     email VARCHAR(320) NOT NULL UNIQUE,
///     full_name VARCHAR(200) NOT NULL,
///     passport_country VARCHAR(2) REFERENCES countries (iso_code),
///     status user_status NOT NULL DEFAULT 'PENDING',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use visapass_shared::models::user::{User, CreateUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     auth_user_id: "firebase-uid-123".to_string(),
///     email: "traveller@example.com".to_string(),
///     full_name: "Ada Traveller".to_string(),
///     passport_country: Some("GB".to_string()),
/// }).await?;
///
/// let found = User::find_by_auth_user_id(&pool, "firebase-uid-123").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::country::normalize_iso_code;

/// Lifecycle status of a user account
///
/// The wire and database form is SCREAMING_SNAKE_CASE (`PROFILE_COMPLETE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Signed up, profile not yet complete
    Pending,

    /// Full name and passport country provided
    ProfileComplete,

    /// Account activated out of band
    Active,

    /// Account suspended out of band
    Suspended,
}

impl UserStatus {
    /// Every status, in lifecycle order
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Pending,
        UserStatus::ProfileComplete,
        UserStatus::Active,
        UserStatus::Suspended,
    ];

    /// Wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "PENDING",
            UserStatus::ProfileComplete => "PROFILE_COMPLETE",
            UserStatus::Active => "ACTIVE",
            UserStatus::Suspended => "SUSPENDED",
        }
    }

    /// Status after a profile update leaves the profile complete or not
    ///
    /// Only `Pending` moves on its own; statuses managed out of band are kept.
    pub fn after_profile_update(self, profile_complete: bool) -> Self {
        match self {
            UserStatus::Pending if profile_complete => UserStatus::ProfileComplete,
            other => other,
        }
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Pending
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown user status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for UserStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// User model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Identifier issued by the external authentication provider
    ///
    /// Unique and never changed after creation.
    pub auth_user_id: String,

    /// Email address, stored lowercase, unique across all users
    pub email: String,

    /// Full name as printed in the passport
    pub full_name: String,

    /// ISO code of the passport-issuing country
    pub passport_country: Option<String>,

    /// Lifecycle status
    pub status: UserStatus,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Profile completeness rule shared by creation and update paths
pub fn profile_is_complete(full_name: &str, passport_country: Option<&str>) -> bool {
    !full_name.trim().is_empty() && passport_country.is_some_and(|c| !c.is_empty())
}

/// Normalises an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Uppercases a well-formed passport country code
///
/// Malformed codes pass through unchanged and fail the foreign key.
fn normalize_passport_country(code: Option<String>) -> Option<String> {
    code.map(|code| normalize_iso_code(&code).unwrap_or(code))
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// External authentication identifier
    pub auth_user_id: String,

    /// Email address (normalised before insert)
    pub email: String,

    /// Full name
    pub full_name: String,

    /// Optional passport country ISO code
    pub passport_country: Option<String>,
}

/// Input for the profile-completion update
///
/// Only `Some` fields are written. `auth_user_id` and `email` are deliberately
/// absent: the first is immutable and the second is owned by the sync call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New full name
    pub full_name: Option<String>,

    /// New passport country ISO code
    pub passport_country: Option<String>,
}

/// Result of [`User::sync`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedUser {
    pub user: User,

    /// Whether the call inserted the row rather than updating it
    pub created: bool,
}

#[derive(sqlx::FromRow)]
struct SyncRow {
    id: Uuid,
    auth_user_id: String,
    email: String,
    full_name: String,
    passport_country: Option<String>,
    status: UserStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created: bool,
}

impl From<SyncRow> for SyncedUser {
    fn from(row: SyncRow) -> Self {
        Self {
            user: User {
                id: row.id,
                auth_user_id: row.auth_user_id,
                email: row.email,
                full_name: row.full_name,
                passport_country: row.passport_country,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            created: row.created,
        }
    }
}

const USER_COLUMNS: &str = "id, auth_user_id, email, full_name, passport_country, status, created_at, updated_at";

impl User {
    /// Creates a new user
    ///
    /// The initial status is `PROFILE_COMPLETE` when the payload already holds
    /// a complete profile, `PENDING` otherwise.
    ///
    /// # Errors
    ///
    /// Returns a database error if `auth_user_id` or `email` already exists
    /// (constraints `users_auth_user_id_key` / `users_email_key`) or the
    /// passport country does not reference an existing country.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let passport_country = normalize_passport_country(data.passport_country);
        let status = UserStatus::Pending.after_profile_update(profile_is_complete(
            &data.full_name,
            passport_country.as_deref(),
        ));

        let query = format!(
            r#"
            INSERT INTO users (auth_user_id, email, full_name, passport_country, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.auth_user_id)
            .bind(normalize_email(&data.email))
            .bind(data.full_name.trim())
            .bind(passport_country)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by the external authentication identifier
    pub async fn find_by_auth_user_id(
        pool: &PgPool,
        auth_user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE auth_user_id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(auth_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Creates the user or re-syncs an existing one in a single statement
    ///
    /// Keyed on `auth_user_id`, so concurrent sign-ins for the same identity
    /// all succeed. On re-sync a `None` passport country keeps the stored one,
    /// and the status only moves from `PENDING` to `PROFILE_COMPLETE`; any
    /// other stored status is left as the row currently holds it.
    ///
    /// # Errors
    ///
    /// Returns a database error if the email belongs to another user or the
    /// passport country does not reference an existing country.
    pub async fn sync(pool: &PgPool, data: CreateUser) -> Result<SyncedUser, sqlx::Error> {
        let passport_country = normalize_passport_country(data.passport_country);
        let status = UserStatus::Pending.after_profile_update(profile_is_complete(
            &data.full_name,
            passport_country.as_deref(),
        ));

        let query = format!(
            r#"
            INSERT INTO users (auth_user_id, email, full_name, passport_country, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (auth_user_id) DO UPDATE
            SET email = EXCLUDED.email,
                full_name = EXCLUDED.full_name,
                passport_country = COALESCE(EXCLUDED.passport_country, users.passport_country),
                status = CASE
                    WHEN users.status = 'PENDING'
                        AND btrim(EXCLUDED.full_name) <> ''
                        AND COALESCE(EXCLUDED.passport_country, users.passport_country) <> ''
                    THEN 'PROFILE_COMPLETE'::user_status
                    ELSE users.status
                END,
                updated_at = NOW()
            RETURNING {USER_COLUMNS}, (xmax = 0) AS created
            "#
        );

        let row = sqlx::query_as::<_, SyncRow>(&query)
            .bind(data.auth_user_id)
            .bind(normalize_email(&data.email))
            .bind(data.full_name.trim())
            .bind(passport_country)
            .bind(status)
            .fetch_one(pool)
            .await?;

        Ok(row.into())
    }

    /// Applies a profile-completion update
    ///
    /// Moves a `PENDING` user to `PROFILE_COMPLETE` once both the full name and
    /// passport country are present after the update. The status is decided
    /// against the row as it stands when the update runs, so a concurrent
    /// activation or suspension is never overwritten.
    ///
    /// # Returns
    ///
    /// The updated user, or `None` if the user doesn't exist
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let full_name = data.full_name.map(|name| name.trim().to_string());
        let passport_country = normalize_passport_country(data.passport_country);

        let query = format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                passport_country = COALESCE($3, passport_country),
                status = CASE
                    WHEN status = 'PENDING'
                        AND btrim(COALESCE($2, full_name)) <> ''
                        AND COALESCE($3, passport_country) <> ''
                    THEN 'PROFILE_COMPLETE'::user_status
                    ELSE status
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(full_name)
            .bind(passport_country)
            .fetch_optional(pool)
            .await
    }

    /// Sets a user's status directly
    ///
    /// Used by out-of-band administration (activation, suspension).
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: UserStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a user by ID (test cleanup and administration only)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
