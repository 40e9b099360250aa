/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use visapass_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = visapass_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use visapass_shared::auth::{
    identity::{identity_middleware, TokenVerifier},
    status_gate::{require_status, StatusGate},
};
use visapass_shared::models::user::UserStatus;

/// Statuses allowed to create and list visa applications
pub const APPLICATION_STATUSES: [UserStatus; 2] = [UserStatus::ProfileComplete, UserStatus::Active];

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Identity token verifier built from the JWT configuration
    pub verifier: TokenVerifier,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let verifier = TokenVerifier::new(&config.jwt.secret, &config.jwt.issuer);

        Self {
            db,
            config: Arc::new(config),
            verifier,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET   /health                  # public
/// ├── GET   /countries               # public
/// ├── GET   /countries/:iso_code     # public
/// ├── POST  /users                   # identity
/// ├── GET   /users/me                # identity + principal
/// ├── PATCH /users/me                # identity + principal
/// ├── POST  /applications            # identity + principal + status gate
/// └── GET   /applications            # identity + principal + status gate
/// ```
///
/// # Middleware Stack
///
/// Applied outermost first:
/// 1. CORS (tower-http CorsLayer)
/// 2. Logging (tower-http TraceLayer)
/// 3. Identity, principal and status gate (route layers per group, so
///    unmatched paths fall through to a plain 404)
pub fn build_router(state: AppState) -> Router {
    use crate::middleware::principal::resolve_principal;
    use crate::routes;

    let identity = from_fn_with_state(state.verifier.clone(), identity_middleware);
    let principal = from_fn_with_state(state.clone(), resolve_principal);

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/countries", get(routes::countries::list_countries))
        .route("/countries/:iso_code", get(routes::countries::get_country));

    // Sync only needs a valid identity: the user may not exist yet
    let sync_routes = Router::new()
        .route("/users", post(routes::users::sync_user))
        .route_layer(identity.clone());

    let user_routes = Router::new()
        .route(
            "/users/me",
            get(routes::users::get_current_user).patch(routes::users::update_current_user),
        )
        .route_layer(principal.clone())
        .route_layer(identity.clone());

    let application_routes = Router::new()
        .route(
            "/applications",
            get(routes::applications::list_applications)
                .post(routes::applications::create_application),
        )
        .route_layer(from_fn_with_state(
            StatusGate::new(APPLICATION_STATUSES),
            require_status,
        ))
        .route_layer(principal)
        .route_layer(identity);

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(sync_routes)
        .merge(user_routes)
        .merge(application_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
