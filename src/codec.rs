//! Payload encoding
//!
//! Bridges Rust values to the wire formats the Cloud API expects:
//!
//! - query parameters through [`ToQueryPairs`] and [`to_flat_map`]
//! - request bodies through [`RequestBody`]
//! - media uploads through [`encode_multipart`]

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncReadExt, BufReader};

use crate::api::media::MediaUpload;
use crate::error::WhatsAppError;
use crate::utils::multipart_boundary;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Body of an outgoing request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Sent verbatim.
    Bytes(Vec<u8>),
    /// Sent verbatim.
    Text(String),
    /// Already-serialized JSON.
    Json(Vec<u8>),
}

impl RequestBody {
    pub fn json<B: Serialize + ?Sized>(value: &B) -> Result<Self, WhatsAppError> {
        serde_json::to_vec(value)
            .map(RequestBody::Json)
            .map_err(|e| WhatsAppError::Encoding(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }
}

/// Conversion of a value into URL query pairs.
pub trait ToQueryPairs {
    fn to_query_pairs(&self) -> Result<Vec<(String, String)>, WhatsAppError>;
}

impl ToQueryPairs for [(&str, &str)] {
    fn to_query_pairs(&self) -> Result<Vec<(String, String)>, WhatsAppError> {
        Ok(self
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect())
    }
}

impl<const N: usize> ToQueryPairs for [(&str, &str); N] {
    fn to_query_pairs(&self) -> Result<Vec<(String, String)>, WhatsAppError> {
        self.as_slice().to_query_pairs()
    }
}

impl ToQueryPairs for BTreeMap<String, String> {
    fn to_query_pairs(&self) -> Result<Vec<(String, String)>, WhatsAppError> {
        Ok(self
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

impl ToQueryPairs for HashMap<String, String> {
    fn to_query_pairs(&self) -> Result<Vec<(String, String)>, WhatsAppError> {
        let mut pairs: Vec<_> = self
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        pairs.sort();
        Ok(pairs)
    }
}

/// Serialize a single-level value into a flat `name -> value` map.
///
/// Fields that serialize to `null`, `""`, `0`, `false` or an empty
/// collection are left out. Nested objects and non-empty arrays are
/// rejected with [`WhatsAppError::Encoding`].
pub fn to_flat_map<T: Serialize + ?Sized>(
    value: &T,
) -> Result<BTreeMap<String, String>, WhatsAppError> {
    let value = serde_json::to_value(value).map_err(|e| WhatsAppError::Encoding(e.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        Value::Null => return Ok(BTreeMap::new()),
        other => {
            return Err(WhatsAppError::Encoding(format!(
                "expected an object, got {}",
                other
            )))
        }
    };

    let mut flat = BTreeMap::new();
    for (key, value) in object {
        let rendered = match value {
            Value::Null | Value::Bool(false) => continue,
            Value::Bool(true) => "true".to_string(),
            Value::Number(number) => {
                if number.as_f64() == Some(0.0) {
                    continue;
                }
                number.to_string()
            }
            Value::String(text) if text.is_empty() => continue,
            Value::String(text) => text,
            Value::Array(items) if items.is_empty() => continue,
            Value::Object(fields) if fields.is_empty() => continue,
            Value::Array(_) | Value::Object(_) => {
                return Err(WhatsAppError::Encoding(format!(
                    "field `{}` is not a scalar",
                    key
                )))
            }
        };
        flat.insert(key, rendered);
    }

    Ok(flat)
}

/// A fully encoded `multipart/form-data` body
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub bytes: Vec<u8>,
    /// Value for the `Content-Type` header, boundary included.
    pub content_type: String,
}

/// Encode a media upload as `multipart/form-data`.
///
/// Parts are written in a fixed order: `file`, `type`, `messaging_product`.
/// In-memory bytes take precedence over the file path.
pub async fn encode_multipart(upload: &MediaUpload) -> Result<MultipartBody, WhatsAppError> {
    let file = upload
        .file
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty());
    if upload.bytes.is_empty() && file.is_none() {
        return Err(WhatsAppError::Validation(
            "either file (path to file) or bytes should be present".to_string(),
        ));
    }
    if upload.filename.is_empty() {
        return Err(WhatsAppError::Validation(
            "filename can not be empty".to_string(),
        ));
    }
    if upload.filename.contains(['"', '\r', '\n']) {
        return Err(WhatsAppError::Validation(format!(
            "filename contains characters not allowed in a form header: {:?}",
            upload.filename
        )));
    }

    let content: Cow<'_, [u8]> = match (file, upload.bytes.is_empty()) {
        (Some(path), true) => Cow::Owned(read_source_file(path).await?),
        _ => Cow::Borrowed(upload.bytes.as_slice()),
    };

    let mime_type = mime_guess::from_path(&upload.filename)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE);

    let mut boundary = multipart_boundary();
    while contains(&content, boundary.as_bytes()) {
        boundary = multipart_boundary();
    }

    let mut bytes = Vec::with_capacity(content.len() + 512);
    bytes.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {mime_type}\r\n\r\n",
            upload.filename
        )
        .as_bytes(),
    );
    bytes.extend_from_slice(&content);
    bytes.extend_from_slice(b"\r\n");
    write_field(&mut bytes, &boundary, "type", &upload.media_type);
    write_field(
        &mut bytes,
        &boundary,
        "messaging_product",
        &upload.messaging_product,
    );
    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Ok(MultipartBody {
        bytes,
        content_type: format!("multipart/form-data; boundary={boundary}"),
    })
}

fn write_field(out: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    out.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
    );
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

// The handle is dropped, and so closed, on every return path.
async fn read_source_file(path: &Path) -> Result<Vec<u8>, WhatsAppError> {
    let io_error = |source: std::io::Error| WhatsAppError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(io_error)?;
    let mut reader = BufReader::new(file);
    let mut content = Vec::new();
    reader.read_to_end(&mut content).await.map_err(io_error)?;
    Ok(content)
}
