//! Baseline request headers.
//!
//! AirWatch expects the tenant API token in `aw-tenant-code` alongside HTTP
//! basic auth on every call. Credentials are fixed for the run; nothing is
//! refreshed or retried on 401/403.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

use crate::error::{ImportError, Result};
use crate::request::Credentials;

pub const TENANT_HEADER: &str = "aw-tenant-code";

/// `Basic base64(username:password)`
pub fn basic_auth_value(username: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    format!("Basic {}", encoded)
}

/// Build the header set shared by every request of a run.
pub fn default_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut token = HeaderValue::from_str(&credentials.api_token)
        .map_err(|_| ImportError::config("api_token", "contains characters not allowed in a header"))?;
    token.set_sensitive(true);
    headers.insert(HeaderName::from_static(TENANT_HEADER), token);

    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut auth = HeaderValue::from_str(&basic_auth_value(
        &credentials.username,
        &credentials.password,
    ))
    .map_err(|_| ImportError::config("api_username", "cannot be encoded as basic auth"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Ok(headers)
}
