/// Database models for VisaPass
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User records keyed by the external authentication identifier
/// - `country`: Country reference data looked up by ISO code
/// - `visa_application`: Visa applications owned by users
///
/// # Example
///
/// ```no_run
/// use visapass_shared::models::country::Country;
/// use visapass_shared::models::user::{User, CreateUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// if Country::exists(&pool, "de").await? {
///     let user = User::create(&pool, CreateUser {
///         auth_user_id: "uid-42".to_string(),
///         email: "someone@example.com".to_string(),
///         full_name: "Some One".to_string(),
///         passport_country: Some("DE".to_string()),
///     }).await?;
///     println!("{} is {}", user.email, user.status);
/// }
/// # Ok(())
/// # }
/// ```

pub mod country;
pub mod user;
pub mod visa_application;
