//! Core request plumbing for [`ApiClient`].
//!
//! Builds endpoint URLs, attaches the bearer token and JSON headers, and
//! decodes the backend's `{ success, data, message, code }` envelope into a
//! `Result`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::ApiError;
use super::cache::CacheValue;
use crate::config::ApiConfig;

/// Header carrying the client-generated key that lets the backend
/// deduplicate a repeated order submission.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Maximum number of body characters copied into logs.
const LOG_BODY_LIMIT: usize = 500;

/// Client for the Aurelle backend REST API.
///
/// Cheap to clone. [`ApiClient::with_token`] derives a client that acts on
/// behalf of one visitor while sharing the connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Option<SecretString>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

/// The backend's response envelope.
#[derive(Debug, serde::Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<Value>,
}

impl ApiClient {
    /// Create a new API client without a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry paths or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
            token: None,
        })
    }

    /// Derive a client that sends `token` as `Authorization: Bearer`.
    #[must_use]
    pub fn with_token(&self, token: Option<SecretString>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token,
        }
    }

    /// Whether requests from this client carry a bearer token.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub(super) fn cache(&self) -> &Cache<String, CacheValue> {
        &self.inner.cache
    }

    /// Build an endpoint URL from percent-encoded path segments and query
    /// parameters.
    pub(super) fn endpoint(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    pub(super) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments, query)?;
        self.execute(Method::GET, url, None, None).await
    }

    pub(super) async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        self.execute(Method::POST, url, Some(serde_json::to_value(body)?), None)
            .await
    }

    pub(super) async fn post_idempotent<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        idempotency_key: &str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        self.execute(
            Method::POST,
            url,
            Some(serde_json::to_value(body)?),
            Some(idempotency_key),
        )
        .await
    }

    pub(super) async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        self.execute(Method::PUT, url, Some(serde_json::to_value(body)?), None)
            .await
    }

    pub(super) async fn patch<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        self.execute(Method::PATCH, url, Some(serde_json::to_value(body)?), None)
            .await
    }

    pub(super) async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments, &[])?;
        self.execute(Method::DELETE, url, None, None).await
    }

    /// Send one request and decode the envelope.
    #[instrument(skip(self, body, idempotency_key), fields(path = %url.path()))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        idempotency_key: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.request(method, url);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            warn!(retry_after, "Backend rate limited request");
            return Err(ApiError::RateLimited(retry_after));
        }

        let text = response.text().await?;
        let result = decode_envelope(status.as_u16(), &text);

        match &result {
            Ok(_) => debug!(status = status.as_u16(), "Backend request succeeded"),
            Err(e) => warn!(
                status = status.as_u16(),
                error = %e,
                body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Backend request failed"
            ),
        }

        result
    }
}

/// Decode a response body into `T`, treating `success: false` and non-2xx
/// statuses as errors.
fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let ok_status = (200..300).contains(&status);

    if ok_status && body.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }

    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if ok_status => return Err(ApiError::Parse(e)),
        Err(_) => return Err(failure(status, None, None)),
    };

    if !ok_status || !envelope.success {
        return Err(failure(
            status,
            envelope.message,
            envelope.code.and_then(code_to_string),
        ));
    }

    Ok(serde_json::from_value(envelope.data)?)
}

fn failure(status: u16, message: Option<String>, code: Option<String>) -> ApiError {
    if status == 401 {
        ApiError::Unauthorized(message)
    } else {
        ApiError::Rejected {
            status,
            message,
            code,
        }
    }
}

/// Backends send codes as strings or numbers.
fn code_to_string(code: Value) -> Option<String> {
    match code {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: Duration::from_secs(5),
            token: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments_after_trailing_slash() {
        let api = client("http://localhost:5000/api/");
        let url = api.endpoint(&["address", "65f1"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/address/65f1");
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let api = client("http://localhost:5000/api");
        let url = api.endpoint(&["product"], &[("q", "rose water".to_string())]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/product?q=rose+water");
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let api = client("http://localhost:5000/");
        let url = api.endpoint(&["support", "a/b"], &[]).unwrap();
        assert_eq!(url.path(), "/support/a%2Fb");
    }

    #[test]
    fn test_with_token_shares_base_url() {
        let api = client("http://localhost:5000/api/");
        assert!(!api.has_token());
        let authed = api.with_token(Some(SecretString::from("token-123")));
        assert!(authed.has_token());
        assert_eq!(authed.base_url(), api.base_url());
    }

    #[test]
    fn test_decode_success_returns_data() {
        let body = r#"{"success":true,"data":{"count":3},"message":"ok"}"#;
        let value: Value = decode_envelope(200, body).unwrap();
        assert_eq!(value["count"], 3);
    }

    #[test]
    fn test_decode_success_false_is_error_even_with_200() {
        let body = r#"{"success":false,"message":"Out of stock","code":"OUT_OF_STOCK"}"#;
        let err = decode_envelope::<Value>(200, body).unwrap_err();
        match err {
            ApiError::Rejected {
                status,
                message,
                code,
            } => {
                assert_eq!(status, 200);
                assert_eq!(message.as_deref(), Some("Out of stock"));
                assert_eq!(code.as_deref(), Some("OUT_OF_STOCK"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_numeric_code() {
        let body = r#"{"success":false,"message":"Bad input","code":4001}"#;
        let err = decode_envelope::<Value>(400, body).unwrap_err();
        assert_eq!(err.code(), Some("4001"));
    }

    #[test]
    fn test_decode_non_json_error_body() {
        let err = decode_envelope::<Value>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 502, message: None, .. }));
    }

    #[test]
    fn test_decode_unauthorized() {
        let body = r#"{"success":false,"message":"Token expired"}"#;
        let err = decode_envelope::<Value>(401, body).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(Some(ref m)) if m == "Token expired"));
    }

    #[test]
    fn test_decode_empty_body_as_unit() {
        decode_envelope::<()>(204, "").unwrap();
    }

    #[test]
    fn test_decode_missing_data_as_unit() {
        decode_envelope::<()>(200, r#"{"success":true,"message":"Deleted"}"#).unwrap();
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let err = decode_envelope::<Value>(200, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
