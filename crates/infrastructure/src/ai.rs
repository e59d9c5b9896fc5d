//! Gemini 文本生成客户端，实现求职信草稿生成。

use application::{CoverLetterGenerator, CoverLetterRequest, GeneratorError};
use async_trait::async_trait;
use config::AiConfig;
use serde::{Deserialize, Serialize};

pub struct GeminiCoverLetterGenerator {
    client: reqwest::Client,
    config: AiConfig,
}

impl GeminiCoverLetterGenerator {
    pub fn new(config: AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn build_prompt(request: &CoverLetterRequest) -> String {
        let skills = if request.skills.is_empty() {
            "not specified".to_string()
        } else {
            request.skills.join(", ")
        };
        format!(
            "Write a professional cover letter for a freelancer applying to a job.\n\
             Job title: {}\n\
             Job description: {}\n\
             Freelancer name: {}\n\
             Freelancer skills: {}\n\
             Keep it under 200 words.",
            request.job_title, request.job_description, request.freelancer_name, skills
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl CoverLetterGenerator for GeminiCoverLetterGenerator {
    async fn generate(&self, request: &CoverLetterRequest) -> Result<String, GeneratorError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GeneratorError::NotConfigured("GEMINI_API_KEY is not set".into()))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
            api_key
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::build_prompt(request),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| GeneratorError::failed(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GeneratorError::failed(format!(
                "generation endpoint returned {}",
                response.status()
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GeneratorError::failed(err.to_string()))?;

        let draft = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| GeneratorError::failed("response contained no candidates"))?;
        Ok(draft)
    }
}
