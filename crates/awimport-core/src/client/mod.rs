//! HTTP client for the AirWatch REST API.
//!
//! One [`AirWatchClient`] is built per run. It carries the baseline headers
//! from [`auth`] and explicit timeouts, and exposes the three request shapes
//! the workflow needs: JSON search, JSON post, and streamed file upload.

pub mod auth;
pub mod models;

use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::error::{ImportError, Result};
use crate::request::ServiceSettings;

const USER_AGENT: &str = concat!("awimport/", env!("CARGO_PKG_VERSION"));

/// Percent-encode a query value, spaces as `%20`.
pub fn encode_query_value(value: &str) -> String {
    // form_urlencoded turns spaces into '+' and a literal '+' into "%2B",
    // so every remaining '+' was a space.
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[derive(Debug, Clone)]
pub struct AirWatchClient {
    http: reqwest::Client,
    base_url: Url,
    /// Whole-request bound for JSON calls. Uploads are only bounded by
    /// `read_timeout`, since their duration grows with the file size.
    request_timeout: Duration,
}

impl AirWatchClient {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let headers = auth::default_headers(&settings.credentials)?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .read_timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| ImportError::transport("build the HTTP client", e))?;

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            request_timeout: settings.timeout,
        })
    }

    /// Build an API URL from a path below the base URL and query pairs.
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        for (i, (key, value)) in query.iter().enumerate() {
            raw.push(if i == 0 { '?' } else { '&' });
            raw.push_str(key);
            raw.push('=');
            raw.push_str(&encode_query_value(value));
        }
        Url::parse(&raw).map_err(|e| ImportError::config("airwatch_url", e.to_string()))
    }

    /// GET a JSON document.
    ///
    /// AirWatch answers searches without hits with `204 No Content`; that and
    /// an empty body map to `Ok(None)`.
    pub async fn get_json<T: DeserializeOwned>(&self, step: &str, url: Url) -> Result<Option<T>> {
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ImportError::transport(step, e))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ImportError::status(step, status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ImportError::transport(step, e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| ImportError::malformed(step, e.to_string()))
    }

    /// POST a JSON body and hand back the status; callers decide what counts as failure.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        step: &str,
        url: Url,
        body: &B,
    ) -> Result<StatusCode> {
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| ImportError::transport(step, e))?;
        Ok(response.status())
    }

    /// Stream a file as the request body and parse the JSON reply.
    ///
    /// The file is read chunk by chunk; the handle is released when the
    /// request completes. No overall deadline applies, only the per-read
    /// stall limit.
    pub async fn post_file<T: DeserializeOwned>(
        &self,
        step: &str,
        url: Url,
        content_type: &str,
        path: &Path,
    ) -> Result<T> {
        let io_error = |source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = tokio::fs::File::open(path).await.map_err(io_error)?;
        let len = file.metadata().await.map_err(io_error)?.len();

        tracing::debug!(%url, bytes = len, content_type, "POST stream");
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, len)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(|e| ImportError::transport(step, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::status(step, status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ImportError::transport(step, e))?;
        serde_json::from_slice(&body).map_err(|e| ImportError::malformed(step, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ImportRequest;

    fn client(base: &str) -> AirWatchClient {
        let settings = ImportRequest::new("/repo")
            .with_service(base, "GRP1")
            .with_credentials("token", "admin", "secret")
            .service_settings()
            .unwrap();
        AirWatchClient::new(&settings).unwrap()
    }

    #[test]
    fn spaces_encode_as_percent_twenty() {
        assert_eq!(encode_query_value("All Corporate Macs"), "All%20Corporate%20Macs");
        assert_eq!(encode_query_value("C++ Tools"), "C%2B%2B%20Tools");
    }

    #[test]
    fn endpoint_joins_path_and_query() {
        let url = client("https://org.example.com")
            .endpoint("/api/mdm/smartgroups/search", &[("name", "All Macs")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://org.example.com/api/mdm/smartgroups/search?name=All%20Macs"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let url = client("https://org.example.com/airwatch/")
            .endpoint("api/system/groups/search", &[("groupid", "GRP1")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://org.example.com/airwatch/api/system/groups/search?groupid=GRP1"
        );
    }
}
