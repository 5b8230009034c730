//! Client configuration
//!
//! [`WhatsAppConfig`] mirrors the `whatsapp:` section hosts usually keep in
//! their YAML or environment config. It only derives `Deserialize`; loading
//! the file is left to the host.
//!
//! ```rust
//! use whatsapp_cloud_sdk::config::WhatsAppConfig;
//!
//! let config: WhatsAppConfig = serde_json::from_str(r#"{
//!     "phone_number_id": "106540352242922",
//!     "access_token": "EAAGm0PX4ZCpsBA",
//!     "template_ids": {"welcome": "hello_world"}
//! }"#).unwrap();
//!
//! assert_eq!(config.api_version(), "v19.0");
//! assert_eq!(config.template_id("welcome"), Some("hello_world"));
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::DEFAULT_API_VERSION;

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Graph API version such as `v19.0`; empty means [`DEFAULT_API_VERSION`].
    pub version: String,
    pub business_account_id: String,
    pub phone_number_id: String,
    pub access_token: String,
    /// Friendly name to template name lookup.
    pub template_ids: HashMap<String, String>,
}

impl WhatsAppConfig {
    pub fn api_version(&self) -> &str {
        if self.version.is_empty() {
            DEFAULT_API_VERSION
        } else {
            &self.version
        }
    }

    pub fn template_id(&self, name: &str) -> Option<&str> {
        self.template_ids.get(name).map(String::as_str)
    }
}

impl std::fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("version", &self.version)
            .field("business_account_id", &self.business_account_id)
            .field("phone_number_id", &self.phone_number_id)
            .field("access_token", &"[REDACTED]")
            .field("template_ids", &self.template_ids)
            .finish()
    }
}
