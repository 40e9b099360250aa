/// Country reference data
///
/// Countries are looked up by their two-letter ISO code and referenced by
/// users (passport country) and visa applications (destination). The API only
/// reads them; the `seed-countries` binary maintains them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE countries (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     iso_code VARCHAR(2) NOT NULL UNIQUE,
///     region VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Country record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Two uppercase letters, unique
    pub iso_code: String,

    /// Optional region (e.g. "Europe")
    pub region: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for seeding a country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertCountry {
    pub name: String,
    pub iso_code: String,
    pub region: Option<String>,
}

/// Normalises user input into the stored ISO code form
///
/// Returns `None` unless the trimmed input is exactly two ASCII letters.
pub fn normalize_iso_code(input: &str) -> Option<String> {
    let code = input.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

impl Country {
    /// Finds a country by ISO code (input is normalised first)
    pub async fn find_by_iso_code(
        pool: &PgPool,
        iso_code: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(code) = normalize_iso_code(iso_code) else {
            return Ok(None);
        };

        sqlx::query_as::<_, Country>(
            r#"
            SELECT id, name, iso_code, region, created_at, updated_at
            FROM countries
            WHERE iso_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    /// Whether a country with this ISO code exists
    pub async fn exists(pool: &PgPool, iso_code: &str) -> Result<bool, sqlx::Error> {
        Ok(Self::find_by_iso_code(pool, iso_code).await?.is_some())
    }

    /// Lists all countries ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Country>(
            r#"
            SELECT id, name, iso_code, region, created_at, updated_at
            FROM countries
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Inserts a country or refreshes the name/region of an existing ISO code
    ///
    /// Well-formed codes are uppercased. Malformed ones are rejected by the
    /// `countries_iso_code_format` check constraint.
    pub async fn upsert(pool: &PgPool, data: UpsertCountry) -> Result<Self, sqlx::Error> {
        let iso_code = normalize_iso_code(&data.iso_code).unwrap_or(data.iso_code);

        sqlx::query_as::<_, Country>(
            r#"
            INSERT INTO countries (name, iso_code, region)
            VALUES ($1, $2, $3)
            ON CONFLICT (iso_code)
            DO UPDATE SET name = EXCLUDED.name, region = EXCLUDED.region, updated_at = NOW()
            RETURNING id, name, iso_code, region, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(iso_code)
        .bind(data.region)
        .fetch_one(pool)
        .await
    }

    /// Counts stored countries
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM countries")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_iso_code() {
        assert_eq!(normalize_iso_code("gb"), Some("GB".to_string()));
        assert_eq!(normalize_iso_code(" Us "), Some("US".to_string()));
        assert_eq!(normalize_iso_code("GBR"), None);
        assert_eq!(normalize_iso_code("G1"), None);
        assert_eq!(normalize_iso_code(""), None);
    }

    #[test]
    fn test_country_serializes_camel_case() {
        let now = Utc::now();
        let country = Country {
            id: Uuid::new_v4(),
            name: "Japan".to_string(),
            iso_code: "JP".to_string(),
            region: Some("Asia".to_string()),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&country).unwrap();
        assert_eq!(json["isoCode"], "JP");
        assert_eq!(json["region"], "Asia");
    }
}
