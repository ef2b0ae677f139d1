use serde_json::json;
use std::io::Write;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mdchat::config::GatewayConfig;
use mdchat::gateway::{Gateway, GeminiGateway, HistoryEntry};

fn gateway_for(server: &MockServer) -> GeminiGateway {
    let config = GatewayConfig {
        api_key: Some("test-key".to_string()),
        api_base: Some(server.uri()),
        ..Default::default()
    };
    GeminiGateway::new(config).unwrap()
}

/// Text generation: normalized reply and faithful request assembly
#[tokio::test]
async fn test_generate_text_normalizes_first_candidate() {
    let server = MockServer::start().await;

    let body = json!({
        "candidates": [
            { "content": { "parts": [
                { "text": "a" },
                { "text": "b" },
                { "inlineData": { "mimeType": "image/png", "data": "Zm9v" } }
            ] } },
            { "content": { "parts": [{ "text": "ignored alternative" }] } }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let history = vec![
        HistoryEntry::system("You are the Blue Faction"),
        HistoryEntry::user("earlier question"),
        HistoryEntry::assistant("earlier answer"),
    ];

    let reply = gateway
        .generate_text("current question", &[], &history)
        .await
        .unwrap();

    assert_eq!(reply.text, "a\nb");
    assert_eq!(reply.images, vec!["data:image/png;base64,Zm9v".to_string()]);

    // The request carries the preamble, history in order, then the turn.
    let requests = server.received_requests().await.unwrap();
    let request_body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let contents = request_body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[0]["role"], "system");
    assert_eq!(contents[1]["role"], "user");
    assert_eq!(contents[1]["parts"][0]["text"], "earlier question");
    assert_eq!(contents[2]["role"], "assistant");
    assert_eq!(contents[3]["role"], "user");
    assert_eq!(contents[3]["parts"][0]["text"], "current question");
    assert_eq!(request_body["generationConfig"]["maxOutputTokens"], 8192);
}

/// Attached images are encoded and follow the text part of the current turn
#[tokio::test]
async fn test_generate_text_encodes_attached_images() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "nice photo" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&[0x89, 0x50, 0x4e, 0x47]).unwrap();

    let gateway = gateway_for(&server);
    let reply = gateway
        .generate_text("what is this", &[file.path().to_path_buf()], &[])
        .await
        .unwrap();
    assert_eq!(reply.text, "nice photo");

    let requests = server.received_requests().await.unwrap();
    let request_body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = request_body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["text"], "what is this");
    assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[1]["inlineData"]["data"], "iVBORw==");
}

/// Transport failures surface the upstream error message
#[tokio::test]
async fn test_generate_text_surfaces_upstream_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "quota exhausted" }
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.generate_text("hi", &[], &[]).await.unwrap_err();
    assert!(err.to_string().contains("quota exhausted"));
}

/// A body with no error message falls back to the HTTP status
#[tokio::test]
async fn test_generate_text_falls_back_to_status_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.generate_text("hi", &[], &[]).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}

/// No candidates means an "empty response" gateway error
#[tokio::test]
async fn test_generate_text_empty_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.generate_text("hi", &[], &[]).await.unwrap_err();
    assert!(err.to_string().contains("empty response"));
}

/// Image generation scans every candidate, not just the first
#[tokio::test]
async fn test_generate_image_scans_all_candidates() {
    let server = MockServer::start().await;

    let body = json!({
        "candidates": [
            { "content": { "parts": [{ "text": "text only" }] } },
            { "content": { "parts": [
                { "inlineData": { "mimeType": "image/jpeg", "data": "YmFy" } }
            ] } }
        ]
    });

    Mock::given(method("POST"))
        .and(path(
            "/v1beta/models/gemini-2.0-flash-exp-image-generation:generateContent",
        ))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let reply = gateway.generate_image("a red fox").await.unwrap();
    assert_eq!(reply.image_url, "data:image/jpeg;base64,YmFy");

    // Image requests opt into the image response modality.
    let requests = server.received_requests().await.unwrap();
    let request_body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        request_body["generationConfig"]["responseModalities"][0],
        "image"
    );
}

/// A text-only reply to an image request is a "no image" failure
#[tokio::test]
async fn test_generate_image_without_image_fragment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/v1beta/models/gemini-2.0-flash-exp-image-generation:generateContent",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "sorry, words only" }] } }]
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.generate_image("a red fox").await.unwrap_err();
    assert!(err.to_string().contains("no image in response"));
}

/// An empty prompt is rejected before any request is issued
#[tokio::test]
async fn test_generate_image_empty_prompt_issues_no_request() {
    let server = MockServer::start().await;

    let gateway = gateway_for(&server);
    let err = gateway.generate_image("").await.unwrap_err();
    assert!(err.to_string().contains("empty prompt"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Image edit sends the prompt part followed by the encoded source image
#[tokio::test]
async fn test_edit_image_payload_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/v1beta/models/gemini-2.0-flash-exp-image-generation:generateContent",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "ZWRpdGVk" } }
            ] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&[1, 2, 3]).unwrap();

    let gateway = gateway_for(&server);
    let reply = gateway
        .edit_image("make it blue", file.path())
        .await
        .unwrap();
    assert_eq!(reply.image_url, "data:image/png;base64,ZWRpdGVk");

    let requests = server.received_requests().await.unwrap();
    let request_body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = request_body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["text"], "make it blue");
    assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
}

/// The edit-specific not-found reason is distinct from generation's
#[tokio::test]
async fn test_edit_image_without_image_fragment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/v1beta/models/gemini-2.0-flash-exp-image-generation:generateContent",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "cannot edit that" }] } }]
        })))
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&[1, 2, 3]).unwrap();

    let gateway = gateway_for(&server);
    let err = gateway
        .edit_image("make it blue", file.path())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no edited image in response"));
}
