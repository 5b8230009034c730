//! Endpoint Contract Tests
//!
//! Drive every endpoint group through the [`WhatsApp`] facade against a mock
//! Graph API and check method, path, headers and payload on the wire.

use std::io::Write;

use serde_json::json;
use whatsapp_cloud_sdk::api::{Message, MediaUpload};
use whatsapp_cloud_sdk::error::WhatsAppError;
use whatsapp_cloud_sdk::types::{AccessToken, PhoneNumberId, LANG_ENGLISH_US};
use whatsapp_cloud_sdk::WhatsApp;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHONE_NUMBER_ID: &str = "106540352242922";

fn create_whatsapp(mock_server: &MockServer) -> WhatsApp {
    WhatsApp::builder()
        .phone_number_id(PhoneNumberId::new(PHONE_NUMBER_ID).unwrap())
        .access_token(AccessToken::new("test_token").unwrap())
        .base_url(mock_server.uri())
        .build()
        .unwrap()
}

// ============================================================================
// Message
// ============================================================================

#[tokio::test]
async fn test_send_text_message_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/106540352242922/messages"))
        .and(header("authorization", "Bearer test_token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "messaging_product": "whatsapp",
            "to": "15551234567",
            "type": "text",
            "text": { "body": "Your order has shipped" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messaging_product": "whatsapp",
            "contacts": [{ "input": "15551234567", "wa_id": "15551234567" }],
            "messages": [{ "id": "wamid.HBgLMTU1NTEyMzQ1NjcVAgARGBI" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);
    let response = whatsapp
        .message()
        .send(&Message::text("15551234567", "Your order has shipped"))
        .await
        .unwrap();

    assert_eq!(response.messaging_product, "whatsapp");
    assert!(!response.recipient_wa_id().unwrap_or_default().is_empty());
    assert_eq!(
        response.message_id(),
        Some("wamid.HBgLMTU1NTEyMzQ1NjcVAgARGBI")
    );
}

#[tokio::test]
async fn test_send_template_from_configured_alias() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/106540352242922/messages"))
        .and(body_json(json!({
            "messaging_product": "whatsapp",
            "to": "15551234567",
            "type": "template",
            "template": { "name": "hello_world", "language": { "code": "en_US" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messaging_product": "whatsapp",
            "messages": [{ "id": "wamid.T1", "message_status": "accepted" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let whatsapp = WhatsApp::builder()
        .phone_number_id(PhoneNumberId::new(PHONE_NUMBER_ID).unwrap())
        .access_token(AccessToken::new("test_token").unwrap())
        .template_id("welcome", "hello_world")
        .base_url(mock_server.uri())
        .build()
        .unwrap();

    let template = whatsapp.template_id("welcome").unwrap();
    let response = whatsapp
        .message()
        .send(&Message::template("15551234567", template, LANG_ENGLISH_US))
        .await
        .unwrap();

    assert_eq!(response.messages[0].message_status.as_deref(), Some("accepted"));
}

#[tokio::test]
async fn test_send_rejected_by_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/106540352242922/messages"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "Recipient phone number not in allowed list", "code": 131030 }
        })))
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);
    let result = whatsapp
        .message()
        .send(&Message::text("15550000000", "hi"))
        .await;

    match result {
        Err(WhatsAppError::RequestFailed { status, body, .. }) => {
            assert_eq!(status, 400);
            assert!(body.contains("131030"));
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_sends_share_one_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/106540352242922/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messaging_product": "whatsapp",
            "messages": [{ "id": "wamid.C" }]
        })))
        .expect(5)
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);
    let sends = (0..5).map(|i| {
        let whatsapp = whatsapp.clone();
        async move {
            whatsapp
                .message()
                .send(&Message::text(format!("1555000000{}", i), "ping"))
                .await
        }
    });

    let results = futures::future::join_all(sends).await;

    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|result| result.is_ok()));
}

// ============================================================================
// Business profile
// ============================================================================

#[tokio::test]
async fn test_business_profile_first_element() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/106540352242922/whatsapp_business_profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "about": "We sell bikes",
                "email": "shop@example.com",
                "messaging_product": "whatsapp",
                "vertical": "RETAIL",
                "websites": ["https://example.com"]
            }]
        })))
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);
    let profile = whatsapp.business_profile().get().await.unwrap();

    assert_eq!(profile.about, "We sell bikes");
    assert_eq!(profile.vertical, "RETAIL");
    assert_eq!(profile.websites, vec!["https://example.com".to_string()]);
}

#[tokio::test]
async fn test_business_profile_empty_data_is_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/106540352242922/whatsapp_business_profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);
    let profile = whatsapp.business_profile().get().await.unwrap();

    assert_eq!(profile, Default::default());
}

#[tokio::test]
async fn test_business_profile_with_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/106540352242922/whatsapp_business_profile"))
        .and(query_param("fields", "about,email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "about": "Hi", "email": "a@example.com" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);
    let profile = whatsapp
        .business_profile()
        .get_with_fields(&["about", "email"])
        .await
        .unwrap();

    assert_eq!(profile.email, "a@example.com");
}

// ============================================================================
// Media
// ============================================================================

#[tokio::test]
async fn test_upload_from_file() {
    let mock_server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("receipt.png");
    let mut file = std::fs::File::create(&file_path).unwrap();
    file.write_all(b"\x89PNG fake image").unwrap();
    drop(file);

    Mock::given(method("POST"))
        .and(path("/v19.0/106540352242922/media"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains(
            "Content-Disposition: form-data; name=\"file\"; filename=\"receipt.png\"",
        ))
        .and(body_string_contains("Content-Type: image/png"))
        .and(body_string_contains("name=\"type\"\r\n\r\nimage/png"))
        .and(body_string_contains("name=\"messaging_product\"\r\n\r\nwhatsapp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "4490709327384033" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);
    let uploaded = whatsapp
        .media()
        .upload(&MediaUpload::from_path(&file_path, "image/png"))
        .await
        .unwrap();

    assert_eq!(uploaded.id, "4490709327384033");

    let received = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body).into_owned();
    let file_at = body.find("name=\"file\"").unwrap();
    let type_at = body.find("name=\"type\"").unwrap();
    let product_at = body.find("name=\"messaging_product\"").unwrap();
    assert!(file_at < type_at && type_at < product_at);
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let whatsapp = create_whatsapp(&mock_server);
    let result = whatsapp
        .media()
        .upload(&MediaUpload::from_path(dir.path().join("nope.pdf"), "application/pdf"))
        .await;

    assert!(matches!(result, Err(WhatsAppError::Io { .. })));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_retrieve_then_download() {
    let mock_server = MockServer::start().await;
    let media_url = format!("{}/v19.0/lookaside/media/1037.jpg", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/v19.0/1037543291543636"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messaging_product": "whatsapp",
            "url": media_url,
            "mime_type": "image/jpeg",
            "sha256": "e3b0c442",
            "file_size": 4,
            "id": "1037543291543636"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v19.0/lookaside/media/1037.jpg"))
        .and(header("authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"JPEG".to_vec(), "image/jpeg"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);
    let info = whatsapp.media().retrieve("1037543291543636").await.unwrap();
    assert_eq!(info.file_size, Some(4));

    let bytes = whatsapp
        .media()
        .download("lookaside/media/1037.jpg")
        .await
        .unwrap();
    assert_eq!(bytes, b"JPEG");
}

#[tokio::test]
async fn test_delete_media_outcomes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v19.0/111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v19.0/222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&mock_server)
        .await;

    let whatsapp = create_whatsapp(&mock_server);

    assert!(whatsapp.media().delete("111").await.is_ok());
    assert!(matches!(
        whatsapp.media().delete("222").await,
        Err(WhatsAppError::OperationFailed(_))
    ));
}
