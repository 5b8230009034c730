//! WhatsApp API trait and context
//!
//! Provides the base trait and context for all endpoint groups.

use std::sync::Arc;

use crate::client::WhatsAppHttpClient;
use crate::types::PhoneNumberId;

/// Context holding shared resources for endpoint groups.
///
/// Contains the HTTP client and the phone number the groups act on
/// behalf of.
#[derive(Clone)]
pub struct WhatsAppContext {
    /// The HTTP client for making API requests
    pub(crate) client: Arc<WhatsAppHttpClient>,
    pub(crate) phone_number_id: PhoneNumberId,
}

impl std::fmt::Debug for WhatsAppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppContext")
            .field("client", &"WhatsAppHttpClient { .. }")
            .field("phone_number_id", &self.phone_number_id)
            .finish()
    }
}

impl WhatsAppContext {
    /// Create a new WhatsAppContext
    pub fn new(client: Arc<WhatsAppHttpClient>, phone_number_id: PhoneNumberId) -> Self {
        Self {
            client,
            phone_number_id,
        }
    }

    /// Get a reference to the HTTP client.
    pub fn client(&self) -> &WhatsAppHttpClient {
        &self.client
    }

    pub fn phone_number_id(&self) -> &PhoneNumberId {
        &self.phone_number_id
    }
}

/// Trait for endpoint groups.
pub trait WhatsAppApi: Send + Sync {
    /// Get a reference to the shared context
    fn context(&self) -> &WhatsAppContext;

    /// Get the name of this API for logging and error context.
    fn api_name(&self) -> &'static str {
        "unknown"
    }
}
