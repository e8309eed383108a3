//! HTTP API route handlers.

pub mod limits;
pub mod resume;
pub mod system;
