//! Send a text message and mark an incoming one as read
//!
//! Run with: cargo run --example send_text

use whatsapp_cloud_sdk::{
    api::Message,
    types::{AccessToken, PhoneNumberId},
    WhatsApp,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let whatsapp = WhatsApp::builder()
        .phone_number_id(PhoneNumberId::new("106540352242922")?)
        .access_token(AccessToken::new("your_access_token_here")?)
        .build()?;

    let message = Message::text("15551234567", "Hello from Rust!");
    match whatsapp.message().send(&message).await {
        Ok(response) => println!(
            "Sent {:?} to {:?}",
            response.message_id(),
            response.recipient_wa_id()
        ),
        Err(error) => eprintln!("send failed: {error}"),
    }

    match whatsapp.message().mark_as_read("wamid.HBgLMTU1NTEyMzQ1NjcVAgASGBQ").await {
        Ok(()) => println!("Marked as read"),
        Err(error) => eprintln!("mark_as_read failed: {error}"),
    }

    Ok(())
}
