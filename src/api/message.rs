//! Message API
//!
//! Sends messages from a business phone number.
//!
//! # Message Types
//!
//! The content of a [`Message`] is a [`MessageContent`] variant; its name is
//! written to the wire as the `type` discriminant:
//!
//! - [`MessageContent::Text`] - Plain text, optionally with link preview
//! - [`MessageContent::Template`] - Pre-approved template
//! - [`MessageContent::Interactive`] - Buttons, lists, products, flows
//! - [`MessageContent::Image`], [`MessageContent::Audio`],
//!   [`MessageContent::Document`], [`MessageContent::Sticker`],
//!   [`MessageContent::Video`] - Media by ID or link
//! - [`MessageContent::Reaction`], [`MessageContent::Location`],
//!   [`MessageContent::Contacts`]
//!
//! # Example
//!
//! ```rust,ignore
//! use whatsapp_cloud_sdk::api::message::Message;
//!
//! let response = whatsapp
//!     .message()
//!     .send(&Message::text("15551234567", "Hello!"))
//!     .await?;
//! println!("Message ID: {:?}", response.message_id());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{WhatsAppApi, WhatsAppContext};
use crate::error::WhatsAppError;
use crate::types::{
    ApiRequest, SuccessResponse, DEFAULT_MESSAGING_PRODUCT, MESSAGE_TYPE_INTERACTIVE,
    MESSAGE_TYPE_TEMPLATE, MESSAGE_TYPE_TEXT,
};
use crate::utils::encode_path;

fn default_messaging_product() -> String {
    DEFAULT_MESSAGING_PRODUCT.to_string()
}

// ============================================================================
// Message envelope
// ============================================================================

/// Outgoing message
///
/// See <https://developers.facebook.com/docs/whatsapp/cloud-api/reference/messages>.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "default_messaging_product")]
    pub messaging_product: String,
    /// `individual` when set; the API assumes it when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<String>,
    /// Recipient phone number or WhatsApp ID.
    pub to: String,
    /// Message being replied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<MessageContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biz_opaque_callback_data: Option<String>,
    #[serde(flatten)]
    pub content: MessageContent,
}

/// Content of a message, tagged on the wire by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextObject },
    Template { template: TemplateObject },
    Interactive { interactive: InteractiveObject },
    Image { image: MediaObject },
    Audio { audio: MediaObject },
    Document { document: MediaObject },
    Sticker { sticker: MediaObject },
    Video { video: MediaObject },
    Reaction { reaction: ReactionObject },
    Location { location: LocationObject },
    /// Contact cards, passed through as raw JSON.
    Contacts { contacts: Vec<serde_json::Value> },
}

impl MessageContent {
    /// Value of the `type` discriminant.
    pub fn message_type(&self) -> &'static str {
        match self {
            MessageContent::Text { .. } => MESSAGE_TYPE_TEXT,
            MessageContent::Template { .. } => MESSAGE_TYPE_TEMPLATE,
            MessageContent::Interactive { .. } => MESSAGE_TYPE_INTERACTIVE,
            MessageContent::Image { .. } => "image",
            MessageContent::Audio { .. } => "audio",
            MessageContent::Document { .. } => "document",
            MessageContent::Sticker { .. } => "sticker",
            MessageContent::Video { .. } => "video",
            MessageContent::Reaction { .. } => "reaction",
            MessageContent::Location { .. } => "location",
            MessageContent::Contacts { .. } => "contacts",
        }
    }
}

impl Message {
    pub fn new(to: impl Into<String>, content: MessageContent) -> Self {
        Self {
            messaging_product: default_messaging_product(),
            recipient_type: None,
            to: to.into(),
            context: None,
            biz_opaque_callback_data: None,
            content,
        }
    }

    /// Plain text message
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(
            to,
            MessageContent::Text {
                text: TextObject::new(body),
            },
        )
    }

    /// Template message without components
    pub fn template(
        to: impl Into<String>,
        name: impl Into<String>,
        language_code: impl Into<String>,
    ) -> Self {
        Self::new(
            to,
            MessageContent::Template {
                template: TemplateObject {
                    name: name.into(),
                    language: Language {
                        code: language_code.into(),
                    },
                    components: Vec::new(),
                },
            },
        )
    }

    /// Emoji reaction to an earlier message
    pub fn reaction(
        to: impl Into<String>,
        message_id: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self::new(
            to,
            MessageContent::Reaction {
                reaction: ReactionObject {
                    message_id: message_id.into(),
                    emoji: emoji.into(),
                },
            },
        )
    }

    pub fn image(to: impl Into<String>, image: MediaObject) -> Self {
        Self::new(to, MessageContent::Image { image })
    }

    pub fn document(to: impl Into<String>, document: MediaObject) -> Self {
        Self::new(to, MessageContent::Document { document })
    }

    /// Send as a reply to `message_id`.
    pub fn reply_to(mut self, message_id: impl Into<String>) -> Self {
        self.context = Some(MessageContext {
            message_id: message_id.into(),
        });
        self
    }

    /// Attach data echoed back in status webhooks.
    pub fn with_callback_data(mut self, data: impl Into<String>) -> Self {
        self.biz_opaque_callback_data = Some(data.into());
        self
    }

    pub fn message_type(&self) -> &'static str {
        self.content.message_type()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    pub message_id: String,
}

// ============================================================================
// Content objects
// ============================================================================

/// Media reference used by audio, document, image, sticker and video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaObject {
    /// ID of uploaded media; set either this or `link`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub caption: String,
    /// Only used for documents.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider: String,
}

impl MediaObject {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn from_link(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Default::default()
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextObject {
    pub body: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub preview_url: bool,
}

impl TextObject {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            preview_url: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateObject {
    pub name: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub code: String,
}

/// Template component: `header`, `body` or `button`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentObject {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sub_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
}

/// Template parameter; `parameter_type` is one of currency, date_time,
/// document, image, text, video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterObject {
    #[serde(rename = "type")]
    pub parameter_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTimeObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaObject>,
}

impl ParameterObject {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parameter_type: "text".to_string(),
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyObject {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fallback_value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub code: String,
    /// Amount multiplied by 1000.
    pub amount_1000: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateTimeObject {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fallback_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionObject {
    pub message_id: String,
    /// Empty string removes an earlier reaction.
    pub emoji: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationObject {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
}

/// Interactive message; `interactive_type` is one of button,
/// catalog_message, list, product, product_list, flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveObject {
    #[serde(rename = "type")]
    pub interactive_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<TextBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<TextBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    pub text: String,
}

impl TextBody {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Interactive header; `header_type` is one of text, video, image, document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderObject {
    #[serde(rename = "type")]
    pub header_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaObject>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionObject {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub button: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<InteractiveButton>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub catalog_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_retailer_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mode: String,
    /// Must be `3` for flows.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub flow_message_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub flow_token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub flow_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub flow_action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_action_payload: Option<serde_json::Value>,
}

/// Button of an interactive `button` message; only `reply` is supported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveButton {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub button_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<InteractiveReplyButton>,
}

impl InteractiveButton {
    pub fn reply(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            button_type: "reply".to_string(),
            reply: Some(InteractiveReplyButton {
                id: id.into(),
                title: title.into(),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveReplyButton {
    pub title: String,
    pub id: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response to a sent message
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub messaging_product: String,
    pub contacts: Vec<MessageContact>,
    pub messages: Vec<SentMessage>,
    /// Present on some API versions instead of `contacts[].wa_id`.
    pub wa_id: String,
}

impl MessageResponse {
    /// WhatsApp ID of the recipient, from whichever field carries it.
    pub fn recipient_wa_id(&self) -> Option<&str> {
        if !self.wa_id.is_empty() {
            return Some(&self.wa_id);
        }
        self.contacts
            .iter()
            .map(|contact| contact.wa_id.as_str())
            .find(|wa_id| !wa_id.is_empty())
    }

    /// ID of the first accepted message.
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|message| message.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageContact {
    pub input: String,
    pub wa_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SentMessage {
    pub id: String,
    pub message_status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ReadReceipt<'a> {
    messaging_product: &'a str,
    status: &'a str,
    message_id: &'a str,
}

// ============================================================================
// MessageApi
// ============================================================================

/// Message API
pub struct MessageApi {
    context: Arc<WhatsAppContext>,
}

impl MessageApi {
    pub fn new(context: Arc<WhatsAppContext>) -> Self {
        Self { context }
    }

    fn path(&self) -> String {
        format!(
            "/{}/messages",
            encode_path(self.context.phone_number_id.as_str())
        )
    }

    /// Send a message
    ///
    /// POST /{phone-number-id}/messages
    pub async fn send(&self, message: &Message) -> Result<MessageResponse, WhatsAppError> {
        let request = ApiRequest::post(self.path()).json(message)?;
        self.context.client.execute(request).await
    }

    /// Mark a received message as read
    ///
    /// POST /{phone-number-id}/messages with `status: "read"`
    ///
    /// # Errors
    /// Returns `WhatsAppError::OperationFailed` when the API answers
    /// `{"success": false}`
    pub async fn mark_as_read(&self, message_id: &str) -> Result<(), WhatsAppError> {
        let receipt = ReadReceipt {
            messaging_product: DEFAULT_MESSAGING_PRODUCT,
            status: "read",
            message_id,
        };
        let request = ApiRequest::post(self.path()).json(&receipt)?;
        let response: SuccessResponse = self.context.client.execute(request).await?;
        WhatsAppError::check_success(
            response.success,
            format!("error on marking message as read: {}", message_id),
        )
    }
}

impl WhatsAppApi for MessageApi {
    fn api_name(&self) -> &'static str {
        "message"
    }

    fn context(&self) -> &WhatsAppContext {
        &self.context
    }
}
