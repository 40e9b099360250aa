/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`jwt`]: identity token generation and validation
/// - [`identity`]: bearer token middleware producing an [`identity::Identity`]
/// - [`principal`]: the stored user resolved for a request
/// - [`status_gate`]: status allow-lists enforced per route group
///
/// # Request flow
///
/// 1. `identity_middleware` validates the bearer token and inserts an `Identity`
/// 2. the API resolves the stored user and inserts a `Principal`
/// 3. `require_status` lets the request through only for allowed statuses
///
/// # Example
///
/// ```
/// use visapass_shared::auth::jwt::{create_token, Claims, DEFAULT_ISSUER};
/// use visapass_shared::auth::identity::TokenVerifier;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-very-secret-key-of-at-least-32-bytes";
/// let token = create_token(&Claims::new("uid-1", "ada@example.com", DEFAULT_ISSUER), secret)?;
///
/// let identity = TokenVerifier::new(secret, DEFAULT_ISSUER).verify(&token)?;
/// assert_eq!(identity.auth_user_id, "uid-1");
/// # Ok(())
/// # }
/// ```

pub mod identity;
pub mod jwt;
pub mod principal;
pub mod status_gate;
