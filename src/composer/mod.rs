//! Recommendation composer module
//!
//! Turns extracted page content or audit results into natural-language SEO
//! recommendations through an LLM completion. Both variants share the same
//! completion settings: temperature 0.7 and a 2000-token output cap. The
//! model's text is returned verbatim; call-layer failures propagate as
//! typed errors.

mod error;
mod prompt;

pub use error::ComposeError;
pub use prompt::{MAX_PROMPT_CHECKS, actionable_checks, audit_prompt, content_prompt};

use crate::audit::AuditCheck;
use crate::browser::PageContent;
use crate::model::Client;
use rig::{
    agent::AgentBuilder,
    completion::{CompletionModel, Prompt},
    embeddings::EmbeddingModel,
};
use tracing::{debug, instrument};

/// Sampling temperature for both recommendation variants
const RECOMMENDATION_TEMPERATURE: f64 = 0.7;

/// Output token cap for both recommendation variants
const MAX_COMPLETION_TOKENS: u64 = 2000;

/// Generate SEO recommendations from summarized page content
///
/// # Arguments
///
/// * `client` - The model client to use
/// * `url` - The analyzed URL
/// * `content` - Summarized page content
///
/// # Returns
///
/// The model's recommendation text, verbatim
#[instrument(skip(client, content), fields(url = url))]
pub async fn analyze_content<C, E>(
    client: &Client<C, E>,
    url: &str,
    content: &PageContent,
) -> Result<String, ComposeError>
where
    C: CompletionModel + Clone,
    E: EmbeddingModel,
{
    let prompt = content_prompt(url, content)?;
    debug!(prompt_chars = prompt.len(), "composed content prompt");
    complete(client.completion(), &prompt).await
}

/// Generate feedback on the most critical audit issues
///
/// # Arguments
///
/// * `client` - The model client to use
/// * `checks` - The flat audit check list, in report order
///
/// # Returns
///
/// The model's feedback text, verbatim
#[instrument(skip(client, checks))]
pub async fn review_audit<C, E>(
    client: &Client<C, E>,
    checks: &[AuditCheck],
) -> Result<String, ComposeError>
where
    C: CompletionModel + Clone,
    E: EmbeddingModel,
{
    let prompt = audit_prompt(checks)?;
    debug!(prompt_chars = prompt.len(), "composed audit prompt");
    complete(client.completion(), &prompt).await
}

async fn complete<C>(model: &C, prompt: &str) -> Result<String, ComposeError>
where
    C: CompletionModel + Clone,
{
    let agent = AgentBuilder::new(model.clone())
        .temperature(RECOMMENDATION_TEMPERATURE)
        .max_tokens(MAX_COMPLETION_TOKENS)
        .build();

    agent
        .prompt(prompt)
        .await
        .map_err(|e| ComposeError::Completion(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock_model::{MockCompletionModel, MockEmbeddingModel};

    fn mock_client() -> Client<MockCompletionModel, MockEmbeddingModel> {
        Client::new(MockCompletionModel::new(), MockEmbeddingModel::new(4))
    }

    fn empty_content() -> PageContent {
        PageContent {
            title: String::new(),
            meta_description: String::new(),
            headings: Default::default(),
            paragraphs: vec![],
            lists: vec![],
            links: vec![],
            images: vec![],
        }
    }

    #[tokio::test]
    async fn test_analyze_content_returns_model_text() {
        let client = mock_client();
        client
            .completion()
            .set_text_response("Add a meta description.")
            .await;

        let analysis = analyze_content(&client, "https://shop.example/", &empty_content())
            .await
            .unwrap();

        assert_eq!(analysis, "Add a meta description.");
    }

    #[tokio::test]
    async fn test_unconfigured_model_yields_empty_string_not_error() {
        let client = mock_client();

        let analysis = analyze_content(&client, "https://shop.example/", &empty_content())
            .await
            .unwrap();

        assert_eq!(analysis, "");
    }

    #[tokio::test]
    async fn test_review_audit_returns_model_text() {
        let client = mock_client();
        client.completion().set_text_response("Fix contrast.").await;

        let feedback = review_audit(&client, &[]).await.unwrap();
        assert_eq!(feedback, "Fix contrast.");
    }
}
