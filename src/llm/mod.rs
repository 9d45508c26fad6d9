//! Script writing: source material in, two-host dialogue out.

pub mod generator;
pub mod prompt;
pub mod vertex;

pub use generator::{GenerationParams, MockGenerator, TextGenerator};
pub use vertex::VertexClient;

use crate::config::Config;
use crate::error::{DialogcastError, Result};
use log::info;

/// Ask `generator` for a dialogue about `content` and clean the reply.
///
/// A reply that is empty after cleanup is a `Generation` error.
pub async fn write_script<G>(generator: &G, config: &Config, content: &str) -> Result<String>
where
    G: TextGenerator + ?Sized,
{
    let prompt = prompt::build_prompt(config, content);
    info!(
        "Writing script with {} from {} characters of source text",
        generator.model_name(),
        content.chars().count()
    );

    let reply = generator.generate(&prompt).await?;
    let script = prompt::clean_response(&reply);
    if script.is_empty() {
        return Err(DialogcastError::Generation {
            message: "model returned an empty script".to_string(),
        });
    }

    info!("Script has {} lines", script.lines().count());
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_script_cleans_reply() {
        let generator = MockGenerator::new("mock").with_response("**Alex:** hi\n\n# Emma: hey\n");
        let script = write_script(&generator, &Config::default(), "source text")
            .await
            .unwrap();
        assert_eq!(script, "Alex: hi\n Emma: hey");

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("source text"));
    }

    #[tokio::test]
    async fn write_script_rejects_empty_reply() {
        let generator = MockGenerator::new("mock").with_response("```\n\n```");
        let result = write_script(&generator, &Config::default(), "x").await;
        assert!(matches!(result, Err(DialogcastError::Generation { .. })));
    }

    #[tokio::test]
    async fn write_script_propagates_generator_failure() {
        let generator = MockGenerator::new("mock").with_failure();
        let result = write_script(&generator, &Config::default(), "x").await;
        assert!(matches!(result, Err(DialogcastError::Generation { .. })));
    }
}
