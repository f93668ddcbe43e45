//! Request authentication
//!
//! Every /method request carries the caller's ed25519 identity in three
//! headers. The signature covers the raw request body concatenated with the
//! timestamp, so neither can be altered or replayed past the staleness
//! window. Rate limiting runs last, after the signature has proven the
//! caller owns the key it is spending tokens from.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use super::handlers::{error_response, AppState};
use crate::config::ServerConfig;
use crate::key;

/// Caller's public key, hex encoded.
pub const KEY_HEADER: &str = "x-key";
/// Unix timestamp (seconds) the request was signed at.
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
/// Hex-encoded ed25519 signature over body plus timestamp.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Bytes a caller signs: the raw body followed by the timestamp string.
pub fn signing_payload(body: &[u8], timestamp: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(body.len() + timestamp.len());
    payload.extend_from_slice(body);
    payload.extend_from_slice(timestamp.as_bytes());
    payload
}

/// Per-key token buckets plus the static access policy.
pub struct AuthState {
    limiter: DefaultKeyedRateLimiter<String>,
    whitelist: Option<HashSet<String>>,
    max_request_age_secs: u64,
}

impl AuthState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let burst = NonZeroU32::new(config.rate_limit_burst)
            .ok_or_else(|| anyhow!("rate limit burst must be at least 1"))?;
        let refill = NonZeroU32::new(config.rate_limit_refill)
            .ok_or_else(|| anyhow!("rate limit refill must be at least 1"))?;
        let quota = Quota::per_second(refill).allow_burst(burst);

        let whitelist = if config.whitelist.is_empty() {
            None
        } else {
            Some(
                config
                    .whitelist
                    .iter()
                    .map(|key| key.to_ascii_lowercase())
                    .collect(),
            )
        };

        Ok(Self {
            limiter: RateLimiter::keyed(quota),
            whitelist,
            max_request_age_secs: config.max_request_age_secs,
        })
    }

    /// Consume one token for `key`. False means the bucket is empty.
    pub fn check_rate(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    /// True when `key` passes the whitelist, or none is configured.
    /// Hex case is ignored.
    pub fn is_allowed(&self, key: &str) -> bool {
        match &self.whitelist {
            Some(list) => list.contains(&key.to_ascii_lowercase()),
            None => true,
        }
    }

    pub fn max_request_age_secs(&self) -> u64 {
        self.max_request_age_secs
    }
}

/// Middleware guarding the /method routes.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let (caller_key, timestamp, signature) = match required_headers(&parts.headers) {
        Ok(headers) => headers,
        Err(message) => {
            return error_response(StatusCode::BAD_REQUEST, &message, "invalid_request_error");
        }
    };
    // Hex decoding is case-insensitive, so the whitelist and the rate
    // limiter must treat case variants of one key as the same caller.
    let caller_key = caller_key.to_ascii_lowercase();

    if !state.auth.is_allowed(&caller_key) {
        return error_response(
            StatusCode::FORBIDDEN,
            "key is not whitelisted",
            "access_denied",
        );
    }

    let signed_at: i64 = match timestamp.parse() {
        Ok(value) => value,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "timestamp must be a unix timestamp in seconds",
                "invalid_request_error",
            );
        }
    };
    if Utc::now().timestamp().abs_diff(signed_at) > state.auth.max_request_age_secs() {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "request timestamp is stale",
            "authentication_error",
        );
    }

    let bytes = match axum::body::to_bytes(body, state.config.max_body_size).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body too large",
                "invalid_request_error",
            );
        }
    };

    let payload = signing_payload(&bytes, &timestamp);
    if let Err(e) = key::verify_signature(&caller_key, &payload, &signature) {
        tracing::debug!(key = %caller_key, "rejected signature: {}", e);
        return error_response(
            StatusCode::UNAUTHORIZED,
            "signature verification failed",
            "authentication_error",
        );
    }

    if !state.auth.check_rate(&caller_key) {
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "rate limit exceeded",
            "rate_limited",
        );
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    next.run(request).await
}

fn required_headers(headers: &HeaderMap) -> Result<(String, String, String), String> {
    let get = |name: &str| -> Result<String, String> {
        headers
            .get(name)
            .ok_or_else(|| format!("missing {} header", name))?
            .to_str()
            .map(|value| value.to_string())
            .map_err(|_| format!("{} header is not valid ascii", name))
    };
    Ok((
        get(KEY_HEADER)?,
        get(TIMESTAMP_HEADER)?,
        get(SIGNATURE_HEADER)?,
    ))
}
