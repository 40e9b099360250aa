//! # Country seeder
//!
//! Upserts country reference data. Without arguments the built-in list is
//! used; a path argument loads a JSON array of `{name, iso_code, region}`
//! objects instead.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/visapass cargo run -p visapass-api --bin seed-countries
//! DATABASE_URL=... cargo run -p visapass-api --bin seed-countries -- countries.json
//! ```

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visapass_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use visapass_shared::models::country::{normalize_iso_code, Country, UpsertCountry};

const BUILT_IN: &[(&str, &str, &str)] = &[
    ("Australia", "AU", "Oceania"),
    ("Brazil", "BR", "South America"),
    ("Canada", "CA", "North America"),
    ("China", "CN", "Asia"),
    ("France", "FR", "Europe"),
    ("Germany", "DE", "Europe"),
    ("India", "IN", "Asia"),
    ("Ireland", "IE", "Europe"),
    ("Italy", "IT", "Europe"),
    ("Japan", "JP", "Asia"),
    ("Kenya", "KE", "Africa"),
    ("Mexico", "MX", "North America"),
    ("Netherlands", "NL", "Europe"),
    ("New Zealand", "NZ", "Oceania"),
    ("Nigeria", "NG", "Africa"),
    ("Singapore", "SG", "Asia"),
    ("South Africa", "ZA", "Africa"),
    ("Spain", "ES", "Europe"),
    ("United Arab Emirates", "AE", "Asia"),
    ("United Kingdom", "GB", "Europe"),
    ("United States", "US", "North America"),
];

fn built_in_countries() -> Vec<UpsertCountry> {
    BUILT_IN
        .iter()
        .map(|(name, iso_code, region)| UpsertCountry {
            name: name.to_string(),
            iso_code: iso_code.to_string(),
            region: Some(region.to_string()),
        })
        .collect()
}

fn load_countries(path: &str) -> anyhow::Result<Vec<UpsertCountry>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid country list in {}", path))
}

/// Normalises ISO codes and rejects malformed or duplicate entries
fn validate_countries(countries: Vec<UpsertCountry>) -> anyhow::Result<Vec<UpsertCountry>> {
    let mut seen = std::collections::HashSet::new();
    let mut validated = Vec::with_capacity(countries.len());

    for country in countries {
        let Some(iso_code) = normalize_iso_code(&country.iso_code) else {
            bail!("Invalid ISO code {:?} for {}", country.iso_code, country.name);
        };
        if country.name.trim().is_empty() {
            bail!("Missing name for {}", iso_code);
        }
        if !seen.insert(iso_code.clone()) {
            bail!("Duplicate ISO code {}", iso_code);
        }

        validated.push(UpsertCountry { iso_code, ..country });
    }

    Ok(validated)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_countries=info,visapass_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let countries = validate_countries(match std::env::args().nth(1) {
        Some(path) => load_countries(&path)?,
        None => built_in_countries(),
    })?;

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;
    let pool = create_pool(DatabaseConfig::from_url(database_url)).await?;
    run_migrations(&pool).await?;

    for country in countries {
        let iso_code = country.iso_code.clone();
        let stored = Country::upsert(&pool, country)
            .await
            .with_context(|| format!("Failed to upsert {}", iso_code))?;
        tracing::debug!(iso_code = %stored.iso_code, name = %stored.name, "Country upserted");
    }

    let total = Country::count(&pool).await?;
    tracing::info!(total, "Country seeding complete");

    close_pool(pool).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, iso_code: &str) -> UpsertCountry {
        UpsertCountry {
            name: name.to_string(),
            iso_code: iso_code.to_string(),
            region: None,
        }
    }

    #[test]
    fn test_built_in_codes_are_valid_and_unique() {
        let countries = built_in_countries();
        let validated = validate_countries(countries.clone()).unwrap();

        assert_eq!(validated, countries);
    }

    #[test]
    fn test_validate_normalises_codes() {
        let validated = validate_countries(vec![country("Japan", " jp ")]).unwrap();
        assert_eq!(validated[0].iso_code, "JP");
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let err = validate_countries(vec![country("Great Britain", "GBR")]).unwrap_err();
        assert!(err.to_string().contains("Invalid ISO code"));

        let err = validate_countries(vec![country("  ", "GB")]).unwrap_err();
        assert!(err.to_string().contains("Missing name"));

        let err =
            validate_countries(vec![country("Japan", "JP"), country("Nippon", "jp")]).unwrap_err();
        assert!(err.to_string().contains("Duplicate ISO code JP"));
    }
}
