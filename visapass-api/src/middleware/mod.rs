/// Middleware modules for the API server
///
/// Identity validation and the status gate live in `visapass-shared`; this
/// module holds the middleware that needs database access.
///
/// - `principal`: resolves the stored user for the caller's identity

pub mod principal;
