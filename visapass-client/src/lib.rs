//! # VisaPass Client Library
//!
//! Client-side building blocks for the VisaPass front ends.
//!
//! ## Modules
//!
//! - `config`: API location and timeout from the environment
//! - `client`: User sync and current-user fetch over HTTP
//! - `route_gate`: Redirects protected views based on the user's status
//! - `logout`: Clears the session and returns to sign-in
//! - `error`: Client error type
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use visapass_client::{client::ApiClient, config::ClientConfig};
//! use visapass_client::route_gate::{Navigator, Route, RouteGate};
//!
//! struct Nav;
//! impl Navigator for Nav {
//!     fn replace(&self, route: Route) {
//!         println!("-> {}", route);
//!     }
//! }
//!
//! # async fn example() -> Result<(), visapass_client::error::ClientError> {
//! let client = Arc::new(ApiClient::new(ClientConfig::default())?);
//! client.set_token("eyJ...").await;
//!
//! let _mounted = RouteGate::new(client, Arc::new(Nav)).mount();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logout;
pub mod route_gate;
