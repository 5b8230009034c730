//! WhatsApp HTTP Client module
//!
//! This module contains the request builder and the client facade.

mod http_client;
pub use http_client::{WhatsAppHttpClient, WhatsAppHttpClientBuilder};

mod whatsapp;
pub use whatsapp::WhatsApp;

mod builder;
pub use builder::WhatsAppBuilder;
