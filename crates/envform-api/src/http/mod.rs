//! HTTP surface modules (router, handlers, middleware).

/// Shared constants and header names for HTTP surfaces.
pub mod constants;
/// Environment file read/write handlers.
pub mod env;
/// Problem response helpers and error types.
pub mod errors;
/// Field catalog diagnostics.
pub mod fields;
/// Directory browser for path fields.
pub mod filesystem;
/// Filter list editing handlers.
pub mod filter;
/// Health and diagnostics endpoints.
pub mod health;
/// Router construction and server host.
pub mod router;
/// Metrics middleware for HTTP requests.
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
