//! Folio Server - request gate for the Folio portfolio builder.
//!
//! The core (rate limiting, policies, resume parsing, metrics) lives in
//! `folio-service`; the REST transport lives in `folio-http`. This crate
//! adds configuration and process wiring.

pub mod config;

pub use folio_http::{AppState, router, serve};
