//! HTTP middleware: client address extraction, rate limiting, request ID tracking.

pub mod client_ip;
pub mod rate_limit;
pub mod request_id;
