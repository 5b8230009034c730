//! Fixed values of the WhatsApp Cloud API.

/// Graph API host, without version segment.
pub const BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v19.0";

pub const DEFAULT_MESSAGING_PRODUCT: &str = "whatsapp";

pub const MESSAGE_TYPE_TEXT: &str = "text";
pub const MESSAGE_TYPE_TEMPLATE: &str = "template";
pub const MESSAGE_TYPE_INTERACTIVE: &str = "interactive";

pub const LANG_ENGLISH: &str = "en";
pub const LANG_ENGLISH_UK: &str = "en_GB";
pub const LANG_ENGLISH_US: &str = "en_US";
pub const LANG_TAMIL: &str = "ta";
