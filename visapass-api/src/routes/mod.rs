/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `countries`: Country reference data (public)
/// - `users`: User sync, current user and profile completion
/// - `applications`: Visa applications (status gated)

pub mod applications;
pub mod countries;
pub mod health;
pub mod users;
