//! Vertex AI `generateContent` client.

use crate::config::Config;
use crate::error::{DialogcastError, Result};
use crate::google::{self, GoogleAuth};
use crate::llm::generator::{GenerationParams, TextGenerator};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "vertex-ai";

/// Regional endpoint of a publisher model.
pub fn endpoint_url(location: &str, project: &str, model: &str) -> String {
    format!(
        "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent"
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

fn build_request<'a>(params: &GenerationParams, prompt: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            max_output_tokens: params.max_output_tokens,
        },
    }
}

/// Join the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(DialogcastError::Generation {
            message: "response contained no candidates".to_string(),
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(DialogcastError::Generation {
            message: format!("candidate contained no text (finish reason: {reason})"),
        });
    }
    Ok(text)
}

/// Client for one Vertex AI publisher model.
#[derive(Debug, Clone)]
pub struct VertexClient {
    http: reqwest::Client,
    auth: GoogleAuth,
    endpoint: String,
    model: String,
    params: GenerationParams,
}

impl VertexClient {
    pub fn new(auth: GoogleAuth, endpoint: String, model: String, params: GenerationParams) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            endpoint,
            model,
            params,
        }
    }

    /// Client for the `[vertex]` section and the shared access token.
    pub fn from_config(config: &Config) -> Result<Self> {
        let vertex = &config.vertex;
        if vertex.project.is_empty() {
            return Err(DialogcastError::ConfigMissing {
                keys: "vertex.project (VERTEX_PROJECT)".to_string(),
            });
        }
        let auth = GoogleAuth::from_config(config)?;
        Ok(Self::new(
            auth,
            endpoint_url(&vertex.location, &vertex.project, &vertex.model),
            vertex.model.clone(),
            GenerationParams::from_config(vertex),
        ))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TextGenerator for VertexClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            "Sending {} character prompt to {}",
            prompt.chars().count(),
            self.model
        );
        let request = build_request(&self.params, prompt);
        let response: GenerateResponse =
            google::post_json(&self.http, &self.auth, SERVICE, &self.endpoint, &request).await?;
        extract_text(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_format() {
        assert_eq!(
            endpoint_url("us-central1", "my-proj", "gemini-1.5-pro-002"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/my-proj/locations/us-central1/publishers/google/models/gemini-1.5-pro-002:generateContent"
        );
    }

    #[test]
    fn test_request_json_shape() {
        let json = serde_json::to_value(build_request(&GenerationParams::default(), "Hi")).unwrap();
        let expected = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "Hi"}]}],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.8,
                "maxOutputTokens": 2048
            }
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Alex: hi\n"},{"text":"Emma: hey"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Alex: hi\nEmma: hey");
    }

    #[test]
    fn test_extract_text_without_candidates_is_error() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_text(response),
            Err(DialogcastError::Generation { .. })
        ));
    }

    #[test]
    fn test_extract_text_reports_finish_reason() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        match extract_text(response) {
            Err(DialogcastError::Generation { message }) => assert!(message.contains("SAFETY")),
            other => panic!("Expected Generation error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_needs_project_and_token() {
        let mut config = Config::default();
        config.vertex.access_token = Some("ya29.x".to_string());
        assert!(matches!(
            VertexClient::from_config(&config),
            Err(DialogcastError::ConfigMissing { .. })
        ));

        config.vertex.project = "proj".to_string();
        let client = VertexClient::from_config(&config).unwrap();
        assert!(client.endpoint().contains("/projects/proj/"));
        assert_eq!(client.model_name(), "gemini-1.5-pro-002");
    }
}
