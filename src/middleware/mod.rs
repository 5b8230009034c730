//! Middleware components for the WhatsApp SDK.
//!
//! Requests sent by [`WhatsAppHttpClient`](crate::client::WhatsAppHttpClient)
//! can be routed through a Tower layer configured with
//! [`WhatsAppBuilder::with_middleware`](crate::client::WhatsAppBuilder::with_middleware).
//!
//! - [`LoggingMiddleware`] - Logs request/response information with
//!   credentials redacted
//!
//! ## Usage
//!
//! ```ignore
//! use whatsapp_cloud_sdk::middleware::LoggingMiddleware;
//!
//! let whatsapp = WhatsApp::builder()
//!     .phone_number_id(phone_number_id)
//!     .access_token(access_token)
//!     .with_middleware(LoggingMiddleware::new().verbose())
//!     .build()?;
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;

pub use logging::{LoggingMiddleware, LoggingMiddlewareService};
