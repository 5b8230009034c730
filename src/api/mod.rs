//! WhatsApp Cloud API endpoint groups
//!
//! - [`business_profile`] - Business profile of the phone number
//! - [`media`] - Media upload, retrieval, deletion and download
//! - [`message`] - Sending messages and read receipts
//!
//! Each group wraps a shared [`WhatsAppContext`] and is obtained from the
//! [`WhatsApp`](crate::WhatsApp) facade.

pub mod business_profile;
pub mod media;
pub mod message;
pub mod r#trait;

pub use business_profile::{BusinessProfile, BusinessProfileApi};
pub use media::{MediaApi, MediaInfo, MediaUpload};
pub use message::{
    ActionObject, ComponentObject, CurrencyObject, DateTimeObject, HeaderObject,
    InteractiveButton, InteractiveObject, InteractiveReplyButton, Language, LocationObject,
    MediaObject, Message, MessageApi, MessageContact, MessageContent, MessageContext,
    MessageResponse, ParameterObject, ReactionObject, SentMessage, TemplateObject, TextBody,
    TextObject,
};
pub use r#trait::{WhatsAppApi, WhatsAppContext};
