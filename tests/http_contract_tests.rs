//! HTTP Contract Tests for WhatsAppHttpClient
//!
//! These tests pin down how the client maps wire outcomes to errors:
//! - non-200 status codes (4xx, 5xx, other 2xx)
//! - 200 OK with a malformed JSON body
//! - transport failures
//! - headers and query strings put on every request

use whatsapp_cloud_sdk::client::WhatsAppHttpClient;
use whatsapp_cloud_sdk::error::WhatsAppError;
use whatsapp_cloud_sdk::types::{AccessToken, ApiRequest};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(base_url: &str) -> WhatsAppHttpClient {
    WhatsAppHttpClient::builder()
        .access_token(AccessToken::new("test_token").unwrap())
        .base_url(format!("{}/v19.0", base_url))
        .build()
        .unwrap()
}

#[derive(serde::Deserialize, Debug)]
#[allow(dead_code)]
struct IdResponse {
    id: String,
}

#[tokio::test]
async fn test_http_4xx_status_returns_request_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/1037543291543636"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "message": "Invalid parameter",
                "type": "OAuthException",
                "code": 100
            }
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let result: Result<IdResponse, _> = client.get("/1037543291543636", &[]).await;

    match result {
        Err(WhatsAppError::RequestFailed {
            status,
            status_text,
            body,
        }) => {
            assert_eq!(status, 400);
            assert_eq!(status_text, "Bad Request");
            assert!(body.contains("Invalid parameter"));
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_401_keeps_body_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/106540352242922/whatsapp_business_profile"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let result: Result<serde_json::Value, _> = client
        .get("/106540352242922/whatsapp_business_profile", &[])
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(401));
    match err {
        WhatsAppError::RequestFailed { body, .. } => assert_eq!(body, "token expired"),
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_5xx_status_returns_request_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/106540352242922/messages"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let result: Result<serde_json::Value, _> = client
        .post("/106540352242922/messages", &serde_json::json!({ "to": "1" }))
        .await;

    match result {
        Err(WhatsAppError::RequestFailed {
            status,
            status_text,
            body,
        }) => {
            assert_eq!(status, 503);
            assert_eq!(status_text, "Service Unavailable");
            assert!(body.is_empty());
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_200_success_status_is_still_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/106540352242922/messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": "x" })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let result: Result<IdResponse, _> = client
        .post("/106540352242922/messages", &serde_json::json!({}))
        .await;

    assert_eq!(result.unwrap_err().status(), Some(201));
}

#[tokio::test]
async fn test_malformed_json_returns_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/1037543291543636"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let result: Result<IdResponse, _> = client.get("/1037543291543636", &[]).await;

    match result {
        Err(WhatsAppError::Decode { body_len, .. }) => assert_eq!(body_len, 9),
        other => panic!("Expected Decode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_returns_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = create_test_client(&format!("http://{}", addr));
    let result: Result<IdResponse, _> = client.get("/1037543291543636", &[]).await;

    assert!(matches!(result, Err(WhatsAppError::Transport(_))));
}

#[tokio::test]
async fn test_every_request_carries_auth_and_accept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v19.0/1037543291543636"))
        .and(header("authorization", "Bearer test_token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let result: serde_json::Value = client.delete("/1037543291543636", &[]).await.unwrap();

    assert_eq!(result["success"], true);
}

#[tokio::test]
async fn test_empty_query_values_are_omitted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/1037543291543636"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "1" })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let request = ApiRequest::get("/1037543291543636")
        .query(&[("phone_number_id", ""), ("fields", "")])
        .unwrap();
    let _: IdResponse = client.execute(request).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), None);
}

#[tokio::test]
async fn test_raw_execution_skips_decoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/attachments/file.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 159, 146, 150], "application/octet-stream"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let bytes = client
        .execute_raw(ApiRequest::get("/attachments/file.bin"))
        .await
        .unwrap();

    assert_eq!(bytes, vec![0u8, 159, 146, 150]);
}

#[tokio::test]
async fn test_unit_execution_ignores_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/106540352242922/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let request = ApiRequest::post("/106540352242922/messages")
        .json(&serde_json::json!({ "status": "read" }))
        .unwrap();

    assert!(client.execute_unit(request).await.is_ok());
}
