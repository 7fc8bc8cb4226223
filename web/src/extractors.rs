//! Custom Axum extractors.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::net::SocketAddr;

/// Client identity used as the rate-limit key.
///
/// # Priority
///
/// 1. `X-Forwarded-For` (first hop in the list)
/// 2. `X-Real-IP`
/// 3. Connection source address (`ConnectInfo`)
///
/// Falls back to `"unknown"` when none is available, e.g. in an in-process
/// test router served without connect info — which then shares one
/// admission budget, exactly what those tests want.
#[derive(Debug, Clone)]
pub struct ClientIdentity(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(forwarded) = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return Ok(Self(forwarded.to_string()));
        }

        if let Some(real_ip) = parts
            .headers
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return Ok(Self(real_ip.to_string()));
        }

        let identity = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| "unknown".to_string(), |info| info.0.ip().to_string());

        Ok(Self(identity))
    }
}
