//! Adapter integration tests against a mocked generateContent endpoint.

use serde_json::{json, Value};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fotostudio::api::GeminiClient;
use fotostudio::core::{EditRequest, GenerateRequest, ImagePayload, ImageSize, StudioError};

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key", server.uri())
}

fn edit_request() -> EditRequest {
    EditRequest::new(ImagePayload::new("image/jpeg", "Zm9v"), "add a rainbow")
}

fn success_body(parts: Value) -> Value {
    json!({
        "candidates": [{
            "content": {"parts": parts, "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn edit_returns_first_inline_part_skipping_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!([
            {"text": "sorry"},
            {"inlineData": {"data": "AAAA", "mimeType": "image/png"}},
            {"inlineData": {"data": "BBBB", "mimeType": "image/jpeg"}}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).edit(&edit_request()).await.unwrap();

    let payload = result.expect("inline part should be found");
    assert_eq!(payload.to_data_uri(), "data:image/png;base64,AAAA");
}

#[tokio::test]
async fn generate_with_text_only_parts_is_absent_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!([
            {"text": "I can only describe that, not draw it."}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateRequest::new("a lighthouse", ImageSize::OneK);
    let result = client_for(&server).generate(&request).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn empty_response_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let request = GenerateRequest::new("anything", ImageSize::TwoK);
    let result = client_for(&server).generate(&request).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn api_failure_propagates_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .expect(1) // a single request: no retry
        .mount(&server)
        .await;

    let err = client_for(&server)
        .edit(&edit_request())
        .await
        .unwrap_err();

    match &err {
        StudioError::Api { message, .. } => {
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(err.is_credential_error());
}

#[tokio::test]
async fn non_json_error_body_is_carried_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let request = GenerateRequest::new("anything", ImageSize::OneK);
    let err = client_for(&server).generate(&request).await.unwrap_err();

    match err {
        StudioError::Api { message, .. } => assert!(message.contains("upstream unavailable")),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn edit_sends_image_part_first_with_no_generation_config() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client_for(&server).edit(&edit_request()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    assert!(requests[0]
        .url
        .path()
        .starts_with("/models/gemini-2.5-flash-image:"));

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[0]["inlineData"]["data"], "Zm9v");
    assert_eq!(parts[1]["text"], "add a rainbow");
    assert!(body.get("generationConfig").is_none());
}

#[tokio::test]
async fn generate_sends_size_hint_to_generation_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let request = GenerateRequest::new("a lighthouse at dusk", ImageSize::FourK);
    client_for(&server).generate(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    assert!(requests[0]
        .url
        .path()
        .starts_with("/models/gemini-3-pro-image-preview:"));

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], "a lighthouse at dusk");
    assert!(parts.get(1).is_none());
    assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "4K");
}
