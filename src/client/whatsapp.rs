//! Unified WhatsApp Cloud API client

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{BusinessProfileApi, MediaApi, MessageApi, WhatsAppContext};
use crate::client::WhatsAppHttpClient;
use crate::config::WhatsAppConfig;
use crate::error::WhatsAppError;

/// Unified WhatsApp Cloud API client
///
/// This is the main entry point for the SDK. Endpoint groups are created
/// on demand and share one HTTP client.
///
/// # Example
///
/// ```rust,ignore
/// use whatsapp_cloud_sdk::WhatsApp;
/// use whatsapp_cloud_sdk::api::Message;
/// use whatsapp_cloud_sdk::types::{AccessToken, PhoneNumberId};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let whatsapp = WhatsApp::builder()
///         .phone_number_id(PhoneNumberId::new("106540352242922")?)
///         .access_token(AccessToken::new("EAAGm0PX4ZCpsBA")?)
///         .build()?;
///
///     let response = whatsapp
///         .message()
///         .send(&Message::text("15551234567", "Hello from Rust!"))
///         .await?;
///     println!("Sent: {:?}", response.message_id());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct WhatsApp {
    context: Arc<WhatsAppContext>,
    version: String,
    business_account_id: Option<String>,
    template_ids: Arc<HashMap<String, String>>,
}

impl std::fmt::Debug for WhatsApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsApp")
            .field("context", &self.context)
            .field("version", &self.version)
            .field("business_account_id", &self.business_account_id)
            .finish_non_exhaustive()
    }
}

impl WhatsApp {
    pub fn builder() -> super::builder::WhatsAppBuilder {
        super::builder::WhatsAppBuilder::default()
    }

    /// Build a client from a loaded [`WhatsAppConfig`].
    pub fn from_config(config: WhatsAppConfig) -> Result<Self, WhatsAppError> {
        Self::builder().config(config)?.build()
    }

    pub(crate) fn new(
        context: Arc<WhatsAppContext>,
        version: String,
        business_account_id: Option<String>,
        template_ids: HashMap<String, String>,
    ) -> Self {
        Self {
            context,
            version,
            business_account_id,
            template_ids: Arc::new(template_ids),
        }
    }

    pub fn phone_number_id(&self) -> &str {
        self.context.phone_number_id.as_str()
    }

    pub fn business_account_id(&self) -> Option<&str> {
        self.business_account_id.as_deref()
    }

    /// Graph API version in use, e.g. `v19.0`
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Look up a template name by its configured alias.
    pub fn template_id(&self, name: &str) -> Option<&str> {
        self.template_ids.get(name).map(String::as_str)
    }

    pub fn client(&self) -> &WhatsAppHttpClient {
        &self.context.client
    }

    pub fn business_profile(&self) -> BusinessProfileApi {
        BusinessProfileApi::new(self.context.clone())
    }

    pub fn media(&self) -> MediaApi {
        MediaApi::new(self.context.clone())
    }

    pub fn message(&self) -> MessageApi {
        MessageApi::new(self.context.clone())
    }
}
