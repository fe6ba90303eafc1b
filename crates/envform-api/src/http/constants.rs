//! Shared HTTP constants (headers, problem URIs).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const CACHE_CONTROL_NO_STORE: &str = "no-store";
pub(crate) const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub(crate) const PROBLEM_INTERNAL: &str = "https://envform.dev/problems/internal";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://envform.dev/problems/bad-request";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://envform.dev/problems/not-found";
