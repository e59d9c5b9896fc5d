//! Gemini 客户端的 HTTP 契约测试，用 wiremock 模拟服务端。

use application::{CoverLetterGenerator, CoverLetterRequest, GeneratorError};
use config::AiConfig;
use infrastructure::GeminiCoverLetterGenerator;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CoverLetterRequest {
    CoverLetterRequest {
        job_title: "Kitchen renovation".to_string(),
        job_description: "Full remodel of a small kitchen".to_string(),
        freelancer_name: "Mika".to_string(),
        skills: vec!["carpentry".to_string(), "tiling".to_string()],
    }
}

#[tokio::test]
async fn sends_prompt_and_returns_first_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("Kitchen renovation"))
        .and(body_string_contains("carpentry, tiling"))
        .and(body_string_contains("under 200 words"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "Dear hiring manager, ..."}]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = GeminiCoverLetterGenerator::new(AiConfig {
        api_key: Some("test-key".to_string()),
        endpoint: server.uri(),
        model: "gemini-2.5-flash".to_string(),
    });

    let draft = generator.generate(&request()).await.unwrap();
    assert_eq!(draft, "Dear hiring manager, ...");
}

#[tokio::test]
async fn missing_api_key_is_a_configuration_error() {
    let generator = GeminiCoverLetterGenerator::new(AiConfig {
        api_key: None,
        endpoint: "http://localhost:1".to_string(),
        model: "gemini-2.5-flash".to_string(),
    });

    let err = generator.generate(&request()).await.unwrap_err();
    assert!(matches!(err, GeneratorError::NotConfigured(_)));
}

#[tokio::test]
async fn upstream_failure_maps_to_generation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let generator = GeminiCoverLetterGenerator::new(AiConfig {
        api_key: Some("test-key".to_string()),
        endpoint: server.uri(),
        model: "gemini-2.5-flash".to_string(),
    });

    let err = generator.generate(&request()).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Failed(_)));
}

#[tokio::test]
async fn empty_candidate_list_is_a_generation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let generator = GeminiCoverLetterGenerator::new(AiConfig {
        api_key: Some("test-key".to_string()),
        endpoint: server.uri(),
        model: "gemini-2.5-flash".to_string(),
    });

    let err = generator.generate(&request()).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Failed(_)));
}
