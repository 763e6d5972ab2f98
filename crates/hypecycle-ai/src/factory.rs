//! Constructs an [`LlmProvider`] from `PipelineConfig::llm_provider`,
//! mirroring the teacher's `llm_factory.rs` feature-gated dispatch.

use std::sync::Arc;

use hypecycle_core::LlmError;

use crate::fake::FakeProvider;
use crate::provider::{LlmProvider, LlmResult};

pub fn create_provider(name: &str) -> LlmResult<Arc<dyn LlmProvider>> {
    match name {
        "fake" => Ok(Arc::new(FakeProvider::new())),

        #[cfg(feature = "anthropic")]
        "anthropic" => {
            let provider = crate::anthropic_provider::AnthropicProvider::from_env()?;
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "anthropic"))]
        "anthropic" => Err(LlmError::Unavailable(
            "anthropic provider requested but the `anthropic` feature is not enabled".into(),
        )),

        #[cfg(feature = "openai-compatible")]
        "openai-compatible" => {
            let config = crate::openai_compatible_provider::OpenAiCompatibleConfig::ollama("llama3");
            let provider = crate::openai_compatible_provider::OpenAiCompatibleProvider::new(config)?;
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "openai-compatible"))]
        "openai-compatible" => Err(LlmError::Unavailable(
            "openai-compatible provider requested but the `openai-compatible` feature is not enabled".into(),
        )),

        other => Err(LlmError::Unavailable(format!("unknown llm provider: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_provider_is_always_available() {
        let provider = create_provider("fake").unwrap();
        assert_eq!(provider.provider_name(), "fake");
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(create_provider("not-a-real-provider").is_err());
    }
}
