//! WhatsApp Cloud API SDK for Rust
//!
//! A typed client for the WhatsApp Cloud API (Graph API), covering the
//! business profile, media and message endpoints.
//!
//! ## API Coverage
//!
//! | Group | Operation | Endpoint |
//! |-------|-----------|----------|
//! | Business Profile | get | `GET /{phone-number-id}/whatsapp_business_profile` |
//! | Media | upload | `POST /{phone-number-id}/media` |
//! | Media | retrieve | `GET /{media-id}` |
//! | Media | delete | `DELETE /{media-id}` |
//! | Media | download | `GET /{media-url}` |
//! | Message | send / mark as read | `POST /{phone-number-id}/messages` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use whatsapp_cloud_sdk::{WhatsApp, api::Message, types::{AccessToken, PhoneNumberId}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let whatsapp = WhatsApp::builder()
//!         .phone_number_id(PhoneNumberId::new("106540352242922")?)
//!         .access_token(AccessToken::new("EAAGm0PX4ZCpsBA")?)
//!         .build()?;
//!
//!     let profile = whatsapp.business_profile().get().await?;
//!     println!("About: {}", profile.about);
//!
//!     let response = whatsapp
//!         .message()
//!         .send(&Message::text("15551234567", "Hello!"))
//!         .await?;
//!     println!("Message ID: {:?}", response.message_id());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Endpoint groups (business profile, media, message)
//! - [`client`] - HTTP request builder and the [`WhatsApp`] facade
//! - [`codec`] - Query, JSON and multipart payload encoding
//! - [`config`] - Deserializable client configuration
//! - [`error`] - Error types
//! - [`middleware`] - Tower middleware (request logging)
//! - [`types`] - Identifiers, request descriptor, response envelopes
//!
//! ## Error Handling
//!
//! The SDK uses the [`WhatsAppError`] enum for error handling:
//!
//! ```rust,ignore
//! use whatsapp_cloud_sdk::WhatsAppError;
//!
//! match result {
//!     Ok(response) => { /* handle success */ }
//!     Err(WhatsAppError::RequestFailed { status, body, .. }) => {
//!         eprintln!("API returned {}: {}", status, body);
//!     }
//!     Err(WhatsAppError::Transport(e)) => {
//!         eprintln!("HTTP error: {}", e);
//!     }
//!     Err(e) => {
//!         eprintln!("Other error: {}", e);
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! Requests and responses are traced at debug level and failures at error
//! level through the [`log`] facade. Nothing is emitted unless the host
//! installs a logger.

pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod middleware;
pub mod types;
mod utils;

pub use client::{WhatsApp, WhatsAppBuilder, WhatsAppHttpClient, WhatsAppHttpClientBuilder};
pub use config::WhatsAppConfig;
pub use error::WhatsAppError;
