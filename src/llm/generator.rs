use crate::config::VertexConfig;
use crate::error::{DialogcastError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Trait for prompt-in, text-out generation.
///
/// This trait allows swapping implementations (Vertex AI vs mock).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the raw reply text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the model answering
    fn model_name(&self) -> &str;
}

/// Implement TextGenerator for Arc<T> to allow sharing across commands.
#[async_trait]
impl<T: TextGenerator> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Sampling settings sent with every prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    pub fn from_config(vertex: &VertexConfig) -> Self {
        Self {
            temperature: vertex.temperature,
            top_k: vertex.top_k,
            top_p: vertex.top_p,
            max_output_tokens: vertex.max_output_tokens,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from_config(&VertexConfig::default())
    }
}

/// Mock generator for testing
#[derive(Debug)]
pub struct MockGenerator {
    model_name: String,
    response: String,
    should_fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Create a new mock generator with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            response: "Alex: mock line\nEmma: mock reply".to_string(),
            should_fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on generate
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        if self.should_fail {
            Err(DialogcastError::Generation {
                message: "mock generation failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
