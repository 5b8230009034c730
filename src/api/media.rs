//! Media Management API
//!
//! Upload, look up, delete and download media used in messages.
//!
//! ## Overview
//!
//! Media is uploaded against a business phone number and referenced by ID
//! when sending messages. Retrieving a media ID yields a short-lived URL,
//! which [`MediaApi::download`] fetches with the same bearer token.
//!
//! ## Example
//!
//! ```ignore
//! use whatsapp_cloud_sdk::api::media::MediaUpload;
//!
//! let upload = MediaUpload::from_path("invoice.pdf", "application/pdf");
//! let uploaded = whatsapp.media().upload(&upload).await?;
//!
//! let info = whatsapp.media().retrieve(&uploaded.id).await?;
//! println!("{} at {}", info.mime_type, info.url);
//! whatsapp.media().delete(&uploaded.id).await?;
//!
//! // `download` takes a path relative to the versioned base URL.
//! let bytes = whatsapp.media().download("lookaside/media/1037.jpg").await?;
//! ```
//!
//! The `url` returned by retrieve is absolute; fetch it with the underlying
//! client instead:
//!
//! ```ignore
//! let bytes = whatsapp
//!     .client()
//!     .http()
//!     .get(&info.url)
//!     .bearer_auth(token)
//!     .send()
//!     .await?
//!     .bytes()
//!     .await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use http::header::{HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::{encode_multipart, to_flat_map, RequestBody, ToQueryPairs};
use crate::error::WhatsAppError;
use crate::types::{ApiRequest, MediaId, SuccessResponse, DEFAULT_MESSAGING_PRODUCT};
use crate::utils::encode_path;

use super::{WhatsAppApi, WhatsAppContext};

/// Media to upload
///
/// Content comes from `bytes` when non-empty, otherwise from the file at
/// `file`.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file: Option<PathBuf>,
    pub bytes: Vec<u8>,
    /// Sent verbatim as the file part's filename.
    pub filename: String,
    /// MIME type of the media, sent as the `type` form field.
    pub media_type: String,
    pub messaging_product: String,
}

impl MediaUpload {
    /// Upload from a local file; the filename is taken from the path.
    pub fn from_path(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file: Some(path),
            bytes: Vec::new(),
            filename,
            media_type: media_type.into(),
            messaging_product: DEFAULT_MESSAGING_PRODUCT.to_string(),
        }
    }

    /// Upload from an in-memory buffer.
    pub fn from_bytes(
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            file: None,
            bytes: bytes.into(),
            filename: filename.into(),
            media_type: media_type.into(),
            messaging_product: DEFAULT_MESSAGING_PRODUCT.to_string(),
        }
    }
}

/// Media object as returned by upload and retrieve
///
/// Upload only fills `id`; retrieve fills the rest.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sha256: String,
    /// Sent as a number or a numeric string depending on API version.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_file_size"
    )]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub messaging_product: String,
}

fn deserialize_file_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FileSize {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<FileSize>::deserialize(deserializer)? {
        Some(FileSize::Number(size)) => Some(size),
        Some(FileSize::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Optional `phone_number_id` selector accepted by retrieve and delete.
#[derive(Debug, Clone, Default, Serialize)]
struct MediaQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number_id: Option<&'a str>,
}

impl ToQueryPairs for MediaQuery<'_> {
    fn to_query_pairs(&self) -> Result<Vec<(String, String)>, WhatsAppError> {
        Ok(to_flat_map(self)?.into_iter().collect())
    }
}

/// Media API
pub struct MediaApi {
    context: Arc<WhatsAppContext>,
}

impl MediaApi {
    /// Create a new MediaApi instance
    pub fn new(context: Arc<WhatsAppContext>) -> Self {
        Self { context }
    }

    /// Upload media
    ///
    /// POST /{phone-number-id}/media
    ///
    /// # Errors
    /// - `WhatsAppError::Validation` when neither bytes nor a file path is
    ///   given, or the filename is empty
    /// - `WhatsAppError::Io` when the file cannot be read
    pub async fn upload(&self, media: &MediaUpload) -> Result<MediaInfo, WhatsAppError> {
        let multipart = encode_multipart(media).await?;
        let content_type = HeaderValue::from_str(&multipart.content_type)
            .map_err(|e| WhatsAppError::Encoding(e.to_string()))?;

        let path = format!(
            "/{}/media",
            encode_path(self.context.phone_number_id.as_str())
        );
        let request = ApiRequest::post(path)
            .header(CONTENT_TYPE, content_type)
            .body(RequestBody::Bytes(multipart.bytes));

        self.context.client.execute(request).await
    }

    /// Retrieve media URL and metadata
    ///
    /// GET /{media-id}
    pub async fn retrieve(&self, media_id: &str) -> Result<MediaInfo, WhatsAppError> {
        self.retrieve_request(media_id, None).await
    }

    /// Retrieve media, restricted to a phone number
    ///
    /// GET /{media-id}?phone_number_id={phone-number-id}
    pub async fn retrieve_for_phone_number(
        &self,
        media_id: &str,
    ) -> Result<MediaInfo, WhatsAppError> {
        let phone_number_id = self.context.phone_number_id.as_str();
        self.retrieve_request(media_id, Some(phone_number_id)).await
    }

    async fn retrieve_request(
        &self,
        media_id: &str,
        phone_number_id: Option<&str>,
    ) -> Result<MediaInfo, WhatsAppError> {
        let request = ApiRequest::get(Self::media_path(media_id)?)
            .query(&MediaQuery { phone_number_id })?;
        self.context.client.execute(request).await
    }

    /// Delete media
    ///
    /// DELETE /{media-id}
    ///
    /// # Errors
    /// Returns `WhatsAppError::OperationFailed` when the API answers
    /// `{"success": false}`
    pub async fn delete(&self, media_id: &str) -> Result<(), WhatsAppError> {
        self.delete_request(media_id, None).await
    }

    /// Delete media, restricted to a phone number
    ///
    /// DELETE /{media-id}?phone_number_id={phone-number-id}
    pub async fn delete_for_phone_number(&self, media_id: &str) -> Result<(), WhatsAppError> {
        let phone_number_id = self.context.phone_number_id.as_str();
        self.delete_request(media_id, Some(phone_number_id)).await
    }

    async fn delete_request(
        &self,
        media_id: &str,
        phone_number_id: Option<&str>,
    ) -> Result<(), WhatsAppError> {
        let request = ApiRequest::delete(Self::media_path(media_id)?)
            .query(&MediaQuery { phone_number_id })?;
        let response: SuccessResponse = self.context.client.execute(request).await?;
        WhatsAppError::check_success(
            response.success,
            format!("error on deleting media: {}", media_id),
        )
    }

    /// Download media content
    ///
    /// GET /{media-url}
    ///
    /// Returns the raw bytes of the response body.
    pub async fn download(&self, media_url: &str) -> Result<Vec<u8>, WhatsAppError> {
        let path = format!("/{}", media_url.trim_start_matches('/'));
        self.context.client.execute_raw(ApiRequest::get(path)).await
    }

    fn media_path(media_id: &str) -> Result<String, WhatsAppError> {
        let media_id = MediaId::new(media_id).map_err(WhatsAppError::Validation)?;
        Ok(format!("/{}", encode_path(media_id.as_str())))
    }
}

impl WhatsAppApi for MediaApi {
    fn api_name(&self) -> &'static str {
        "media"
    }

    fn context(&self) -> &WhatsAppContext {
        &self.context
    }
}
