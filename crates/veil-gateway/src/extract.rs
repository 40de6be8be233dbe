//! Request facts the services need from the HTTP layer.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

const CF_CONNECTING_IP: &str = "cf-connecting-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";
const CF_TIMEZONE: &str = "cf-timezone";

/// The caller's network address, when it can be determined.
///
/// Proxy headers win over the socket peer, in the order
/// `CF-Connecting-IP`, first `X-Forwarded-For` entry, `X-Real-IP`.
#[derive(Debug, Clone, Copy)]
pub struct ClientAddr(pub Option<IpAddr>);

impl<S: Send + Sync> FromRequestParts<S> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(ClientAddr(client_ip(&parts.headers).or(peer)))
    }
}

fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    header_ip(headers, CF_CONNECTING_IP)
        .or_else(|| {
            headers
                .get(X_FORWARDED_FOR)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|first| first.trim().parse().ok())
        })
        .or_else(|| header_ip(headers, X_REAL_IP))
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// The visitor timezone reported by the edge, if any.
#[derive(Debug, Clone)]
pub struct TimezoneHint(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for TimezoneHint {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let timezone = parts
            .headers
            .get(CF_TIMEZONE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(TimezoneHint(timezone))
    }
}
