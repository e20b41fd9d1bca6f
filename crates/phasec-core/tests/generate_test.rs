//! HTTP tests for the generator adapters against a local mock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use phasec_core::{
    AnthropicGenerator, FillError, FillOptions, GenerateError, Generator, GeneratorConfig,
    OpenAiGenerator, PLACEHOLDER, Provider, build_skeleton, fill_plan,
};
use phasec_test_utils::sample_spec;

const API_KEY: &str = "sk-test";

fn config_for(provider: Provider, server: &MockServer) -> GeneratorConfig {
    let mut config = GeneratorConfig::for_provider(provider);
    config.base_url = format!("{}/", server.uri());
    config
}

fn anthropic(server: &MockServer) -> AnthropicGenerator {
    AnthropicGenerator::new(&config_for(Provider::Anthropic, server), API_KEY.to_owned()).unwrap()
}

fn openai(server: &MockServer) -> OpenAiGenerator {
    OpenAiGenerator::new(&config_for(Provider::OpenAi, server), API_KEY.to_owned()).unwrap()
}

fn assert_api_error(err: GenerateError, expected_status: u16, expected_message: &str) {
    match err {
        GenerateError::Api { status, message } => {
            assert_eq!(status, expected_status);
            assert!(message.contains(expected_message), "{message}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

// -----------------------------------------------------------------------
// Anthropic
// -----------------------------------------------------------------------

#[tokio::test]
async fn anthropic_sends_auth_headers_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", API_KEY))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-haiku-4-5-20251001",
            "max_tokens": 1024,
            "messages": [{"role": "user", "content": "plan phase 1"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "{\"deliverable\": \"D1\"}"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = anthropic(&server).generate("plan phase 1").await.unwrap();
    assert_eq!(text, "{\"deliverable\": \"D1\"}");
}

#[tokio::test]
async fn anthropic_client_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
        .mount(&server)
        .await;

    let err = anthropic(&server).generate("p").await.unwrap_err();
    assert_api_error(err, 401, "invalid x-api-key");
}

#[tokio::test]
async fn anthropic_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = anthropic(&server).generate("p").await.unwrap_err();
    assert_api_error(err, 529, "overloaded");
}

#[tokio::test]
async fn anthropic_garbage_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = anthropic(&server).generate("p").await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidResponse(_)), "{err:?}");
}

// -----------------------------------------------------------------------
// OpenAI
// -----------------------------------------------------------------------

#[tokio::test]
async fn openai_sends_bearer_token_and_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_completion_tokens": 1024,
            "messages": [{"role": "user", "content": "plan phase 2"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{}"}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = openai(&server).generate("plan phase 2").await.unwrap();
    assert_eq!(text, "{}");
}

#[tokio::test]
async fn openai_error_statuses_map_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = openai(&server).generate("p").await.unwrap_err();
    assert_api_error(err, 429, "rate limited");
}

#[tokio::test]
async fn openai_garbage_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = openai(&server).generate("p").await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn openai_empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = openai(&server).generate("p").await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidResponse(_)), "{err:?}");
}

// -----------------------------------------------------------------------
// Through the fill pipeline
// -----------------------------------------------------------------------

#[tokio::test]
async fn backend_failure_stops_fill_at_first_phase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let spec = sample_spec(6);
    let mut plan = build_skeleton(&spec);
    let generator = anthropic(&server);

    let err = fill_plan(&spec, &mut plan, &generator, &FillOptions::default())
        .await
        .unwrap_err();
    match err {
        FillError::Backend { phase, source } => {
            assert_eq!(phase, 1);
            assert_api_error(source, 500, "internal error");
        }
        other => panic!("expected Backend error, got {other:?}"),
    }
    assert!(plan.phases.iter().all(|p| p.deliverable == PLACEHOLDER));
}
