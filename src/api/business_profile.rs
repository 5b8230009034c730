//! Business Profile API
//!
//! Reads the profile shown to customers for a business phone number.
//!
//! ## Example
//!
//! ```ignore
//! let profile = whatsapp.business_profile().get().await?;
//! println!("About: {}", profile.about);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::{to_flat_map, ToQueryPairs};
use crate::error::WhatsAppError;
use crate::types::{ApiRequest, DataEnvelope};
use crate::utils::encode_path;

use super::{WhatsAppApi, WhatsAppContext};

/// Business profile of a phone number
///
/// Missing fields decode as empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub about: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub messaging_product: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_picture_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vertical: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub websites: Vec<String>,
}

/// `fields=` selector for [`BusinessProfileApi::get_with_fields`]
#[derive(Debug, Clone, Default, Serialize)]
struct ProfileFieldsQuery {
    fields: String,
}

impl ToQueryPairs for ProfileFieldsQuery {
    fn to_query_pairs(&self) -> Result<Vec<(String, String)>, WhatsAppError> {
        Ok(to_flat_map(self)?.into_iter().collect())
    }
}

/// Business Profile API
pub struct BusinessProfileApi {
    context: Arc<WhatsAppContext>,
}

impl BusinessProfileApi {
    pub fn new(context: Arc<WhatsAppContext>) -> Self {
        Self { context }
    }

    fn path(&self) -> String {
        format!(
            "/{}/whatsapp_business_profile",
            encode_path(self.context.phone_number_id.as_str())
        )
    }

    /// Get the business profile
    ///
    /// GET /{phone-number-id}/whatsapp_business_profile
    ///
    /// Returns the first entry of the `data` envelope, or an empty profile
    /// when the envelope holds none.
    pub async fn get(&self) -> Result<BusinessProfile, WhatsAppError> {
        let envelope: DataEnvelope<BusinessProfile> =
            self.context.client.execute(ApiRequest::get(self.path())).await?;
        Ok(envelope.into_first_or_default())
    }

    /// Get the business profile, asking only for the listed fields
    ///
    /// GET /{phone-number-id}/whatsapp_business_profile?fields=about,email
    pub async fn get_with_fields(&self, fields: &[&str]) -> Result<BusinessProfile, WhatsAppError> {
        let query = ProfileFieldsQuery {
            fields: fields.join(","),
        };
        let request = ApiRequest::get(self.path()).query(&query)?;
        let envelope: DataEnvelope<BusinessProfile> = self.context.client.execute(request).await?;
        Ok(envelope.into_first_or_default())
    }
}

impl WhatsAppApi for BusinessProfileApi {
    fn api_name(&self) -> &'static str {
        "business_profile"
    }

    fn context(&self) -> &WhatsAppContext {
        &self.context
    }
}
