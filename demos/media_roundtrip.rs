//! Upload a file, send it as a document, look it up and delete it
//!
//! Run with: cargo run --example media_roundtrip -- path/to/file.pdf

use whatsapp_cloud_sdk::{
    api::{MediaObject, MediaUpload, Message},
    types::{AccessToken, PhoneNumberId},
    WhatsApp,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "invoice.pdf".to_string());

    let whatsapp = WhatsApp::builder()
        .phone_number_id(PhoneNumberId::new("106540352242922")?)
        .access_token(AccessToken::new("your_access_token_here")?)
        .build()?;

    let uploaded = whatsapp
        .media()
        .upload(&MediaUpload::from_path(&path, "application/pdf"))
        .await?;
    println!("Uploaded media {}", uploaded.id);

    let document = MediaObject::from_id(&uploaded.id).caption("Your invoice");
    whatsapp
        .message()
        .send(&Message::document("15551234567", document))
        .await?;

    let info = whatsapp.media().retrieve(&uploaded.id).await?;
    println!("{} ({} bytes) at {}", info.mime_type, info.file_size.unwrap_or(0), info.url);

    whatsapp.media().delete(&uploaded.id).await?;
    println!("Deleted media {}", uploaded.id);

    Ok(())
}
