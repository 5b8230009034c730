//! WhatsApp HTTP Client
//!
//! Shared request builder used by every endpoint group: composes the URL,
//! layers headers, attaches query and body, performs one round trip and
//! classifies the response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use log::{debug, error, trace};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tower::Service;

use crate::codec::RequestBody;
use crate::error::WhatsAppError;
use crate::types::{AccessToken, ApiRequest, BASE_URL, DEFAULT_API_VERSION};

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub(crate) type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// WhatsApp Cloud API HTTP client
///
/// Holds the versioned base URL and the client-level headers (the bearer
/// token). Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct WhatsAppHttpClient {
    http: Client,
    base_url: String,
    headers: HeaderMap,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for WhatsAppHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppHttpClient")
            .field("base_url", &self.base_url)
            .field(
                "headers",
                &self.headers.keys().map(HeaderName::as_str).collect::<Vec<_>>(),
            )
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

/// Overlay `layer` onto `target`. Every name in `layer` replaces all values
/// of that name in `target`, so no header ends up duplicated.
pub(crate) fn merge_headers(target: &mut HeaderMap, layer: &HeaderMap) {
    for (name, value) in layer {
        target.insert(name.clone(), value.clone());
    }
}

impl WhatsAppHttpClient {
    /// Create a new client builder
    pub fn builder() -> WhatsAppHttpClientBuilder {
        WhatsAppHttpClientBuilder::default()
    }

    /// Versioned base URL, e.g. `https://graph.facebook.com/v19.0`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client-level headers applied to every request
    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the underlying [`reqwest::Client`].
    ///
    /// Requests made through it bypass the middleware pipeline and the
    /// client-level headers.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    pub(crate) fn build_request(&self, request: ApiRequest) -> Result<reqwest::Request, WhatsAppError> {
        let ApiRequest {
            method,
            path,
            content_type,
            headers: overlay,
            query,
            body,
        } = request;

        let url = format!("{}{}", self.base_url, path);

        let mut headers = HeaderMap::new();
        if method == Method::POST {
            if let Some(content_type) = content_type {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        merge_headers(&mut headers, &self.headers);
        merge_headers(&mut headers, &overlay);

        let mut builder = self.http.request(method, url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Bytes(bytes) | RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Text(text) => builder.body(text),
        };

        Ok(builder.build()?)
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    /// Perform the round trip and return the body of a `200 OK` response.
    async fn round_trip(&self, request: ApiRequest) -> Result<Vec<u8>, WhatsAppError> {
        let request = self.build_request(request)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!("[WhatsApp] >>> {} {}", method, url);

        let response = self.send_request(request).await.map_err(|e| {
            error!("[WhatsApp] {} {} failed: {}", method, url, e);
            WhatsAppError::Transport(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("[WhatsApp] reading response body of {} failed: {}", url, e);
            WhatsAppError::Transport(e)
        })?;
        debug!("[WhatsApp] <<< {} {} ({} bytes)", status, url, body.len());
        trace!("[WhatsApp] response body: {}", String::from_utf8_lossy(&body));

        if status != StatusCode::OK {
            error!("[WhatsApp] {} {} returned {}", method, url, status);
            return Err(WhatsAppError::RequestFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }

    /// Execute a request and decode the JSON response into `T`.
    ///
    /// # Errors
    /// - `WhatsAppError::Transport` when the request cannot be sent or read
    /// - `WhatsAppError::RequestFailed` for any status other than 200
    /// - `WhatsAppError::Decode` when the body does not match `T`
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, WhatsAppError> {
        let body = self.round_trip(request).await?;
        serde_json::from_slice(&body).map_err(|source| {
            error!("[WhatsApp] response decode failed: {}", source);
            WhatsAppError::Decode {
                source,
                body_len: body.len(),
            }
        })
    }

    /// Execute a request whose response body is not inspected.
    pub async fn execute_unit(&self, request: ApiRequest) -> Result<(), WhatsAppError> {
        self.round_trip(request).await.map(|_| ())
    }

    /// Execute a request and return the raw response body.
    pub async fn execute_raw(&self, request: ApiRequest) -> Result<Vec<u8>, WhatsAppError> {
        self.round_trip(request).await
    }

    /// Make a GET request to the Cloud API
    ///
    /// # Arguments
    /// * `path` - API endpoint path (e.g., "/106540352242922/whatsapp_business_profile")
    /// * `query` - Query parameters as key-value pairs; empty values are omitted
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WhatsAppError> {
        self.execute(ApiRequest::get(path).query(query)?).await
    }

    /// Make a POST request with a JSON body to the Cloud API
    pub async fn post<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, WhatsAppError> {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    /// Make a DELETE request to the Cloud API
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WhatsAppError> {
        self.execute(ApiRequest::delete(path).query(query)?).await
    }
}

impl Service<reqwest::Request> for WhatsAppHttpClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

/// Builder for WhatsAppHttpClient
///
/// # Example
///
/// ```rust
/// use whatsapp_cloud_sdk::client::WhatsAppHttpClient;
/// use whatsapp_cloud_sdk::types::AccessToken;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = WhatsAppHttpClient::builder()
///         .access_token(AccessToken::new("EAAGm0PX4ZCpsBA")?)
///         .build()?;
///
///     assert_eq!(client.base_url(), "https://graph.facebook.com/v19.0");
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct WhatsAppHttpClientBuilder {
    access_token: Option<AccessToken>,
    base_url: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl WhatsAppHttpClientBuilder {
    /// Set the access token sent as `Authorization: Bearer ...`
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Set the versioned base URL for API calls
    ///
    /// Default: `<https://graph.facebook.com/v19.0>`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add a client-level header. A later call with the same name wins.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the total timeout for requests
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the WhatsAppHttpClient
    ///
    /// # Errors
    /// Returns `WhatsAppError::Config` if the access token is missing or a
    /// header cannot be represented
    pub fn build(self) -> Result<WhatsAppHttpClient, WhatsAppError> {
        let access_token = self
            .access_token
            .ok_or_else(|| WhatsAppError::Config("access_token is required".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| format!("{}/{}", BASE_URL, DEFAULT_API_VERSION));
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| WhatsAppError::Config(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| WhatsAppError::Config(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }

        let mut authorization = HeaderValue::from_str(&access_token.bearer())
            .map_err(|e| WhatsAppError::Config(format!("invalid access_token: {e}")))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(WhatsAppHttpClient {
            http: client,
            base_url,
            headers,
            middleware_executor: None,
        })
    }
}
