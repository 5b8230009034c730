use http::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use crate::codec::{RequestBody, ToQueryPairs};
use crate::error::WhatsAppError;

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";

/// Description of a single API call, executed by
/// [`WhatsAppHttpClient::execute`](crate::client::WhatsAppHttpClient::execute).
///
/// ```rust
/// use whatsapp_cloud_sdk::types::ApiRequest;
///
/// let request = ApiRequest::get("/1037543291543636")
///     .query(&[("phone_number_id", "106540352242922")])
///     .unwrap();
/// assert_eq!(request.path(), "/1037543291543636");
/// ```
#[derive(Debug)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) content_type: Option<&'static str>,
    pub(crate) headers: HeaderMap,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let content_type = if method == Method::POST {
            Some(CONTENT_TYPE_JSON)
        } else {
            None
        };
        Self {
            method,
            path: path.into(),
            content_type,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Set a per-call header, replacing any earlier value of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Overlay a whole header map onto this request.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    /// Append query parameters. Empty values are dropped and a repeated key
    /// keeps only its last value.
    pub fn query<Q: ToQueryPairs + ?Sized>(mut self, params: &Q) -> Result<Self, WhatsAppError> {
        for (key, value) in params.to_query_pairs()? {
            if value.is_empty() {
                continue;
            }
            self.query.retain(|(existing, _)| *existing != key);
            self.query.push((key, value));
        }
        Ok(self)
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<B: Serialize + ?Sized>(self, value: &B) -> Result<Self, WhatsAppError> {
        let body = RequestBody::json(value)?;
        Ok(self.body(body))
    }
}
