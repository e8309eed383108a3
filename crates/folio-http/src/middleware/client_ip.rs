//! Client address resolution.
//!
//! Proxy headers are consulted in a fixed order: the first entry of
//! `X-Forwarded-For`, then `X-Real-IP`, then `CF-Connecting-IP`. Callers
//! with none of them share the `"unknown"` bucket.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Address used when no client address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Returns the client address advertised by proxy headers.
///
/// Without proxy headers the TCP peer is used when known, so direct callers
/// do not all land in the shared `"unknown"` bucket.
pub fn resolve_client(headers: &HeaderMap, peer: Option<&ConnectInfo<SocketAddr>>) -> String {
    forwarded_address(headers)
        .or_else(|| peer.map(|ci| ci.0.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_address(headers: &HeaderMap) -> Option<String> {
    if let Some(xff) = header_str(headers, "x-forwarded-for")
        && let Some(first) = xff.split(',').next().map(str::trim)
        && !first.is_empty()
    {
        return Some(first.to_string());
    }

    header_str(headers, "x-real-ip")
        .or_else(|| header_str(headers, "cf-connecting-ip"))
        .map(String::from)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Extractor yielding the resolved client address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts.extensions.get::<ConnectInfo<SocketAddr>>();
        Ok(Self(resolve_client(&parts.headers, peer)))
    }
}
