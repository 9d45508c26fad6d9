//! Shared plumbing for the Google Cloud REST APIs.
//!
//! Both the speech and the generative endpoints take a JSON body and an
//! OAuth bearer token. Minting the token is left to the user
//! (`gcloud auth print-access-token`).

use crate::config::Config;
use crate::error::{DialogcastError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Error bodies are echoed up to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Bearer token plus the project billed for the calls.
#[derive(Clone)]
pub struct GoogleAuth {
    access_token: String,
    quota_project: Option<String>,
}

impl fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleAuth")
            .field("access_token", &"<redacted>")
            .field("quota_project", &self.quota_project)
            .finish()
    }
}

impl GoogleAuth {
    pub fn new(access_token: impl Into<String>, quota_project: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            quota_project,
        }
    }

    /// Token from `GOOGLE_ACCESS_TOKEN`, billed to `VERTEX_PROJECT`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.access_token()?;
        let project = Some(config.vertex.project.clone()).filter(|p| !p.is_empty());
        Ok(Self::new(token, project))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.bearer_auth(&self.access_token);
        match &self.quota_project {
            Some(project) => builder.header("x-goog-user-project", project),
            None => builder,
        }
    }
}

/// POST `body` as JSON and decode the JSON reply.
///
/// Non-2xx replies become `Http` errors carrying the start of the body.
pub async fn post_json<B, R>(
    http: &reqwest::Client,
    auth: &GoogleAuth,
    service: &str,
    url: &str,
    body: &B,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let http_error = |message: String| DialogcastError::Http {
        service: service.to_string(),
        message,
    };

    let response = auth
        .authorize(http.post(url))
        .json(body)
        .send()
        .await
        .map_err(|e| http_error(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(http_error(format!(
            "status {}: {}",
            status,
            truncate(&text, MAX_ERROR_BODY_CHARS)
        )));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| http_error(format!("invalid response body: {e}")))
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let auth = GoogleAuth::new("ya29.very-secret", Some("proj".to_string()));
        let shown = format!("{:?}", auth);
        assert!(!shown.contains("very-secret"));
        assert!(shown.contains("proj"));
    }

    #[test]
    fn from_config_requires_token() {
        let mut config = Config::default();
        config.vertex.project = "proj".to_string();
        assert!(matches!(
            GoogleAuth::from_config(&config),
            Err(DialogcastError::ConfigMissing { .. })
        ));

        config.vertex.access_token = Some("ya29.x".to_string());
        let auth = GoogleAuth::from_config(&config).unwrap();
        assert_eq!(auth.quota_project.as_deref(), Some("proj"));
    }

    #[test]
    fn from_config_without_project_skips_quota_header() {
        let mut config = Config::default();
        config.vertex.access_token = Some("ya29.x".to_string());
        let auth = GoogleAuth::from_config(&config).unwrap();
        assert!(auth.quota_project.is_none());
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("  short  ", 10), "short");
    }

    #[test]
    fn truncate_cuts_long_text() {
        let long = "x".repeat(50);
        assert_eq!(truncate(&long, 10), format!("{}...", "x".repeat(10)));
    }
}
