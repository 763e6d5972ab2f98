//! LLM provider abstraction (component used by C and F): a typed interface
//! over structured-output-capable chat models, plus the schemas each
//! LLM-assisted stage requires.

pub mod factory;
pub mod fake;
pub mod provider;
pub mod structured;

#[cfg(feature = "anthropic")]
pub mod anthropic_provider;
#[cfg(feature = "openai-compatible")]
pub mod openai_compatible_provider;

pub use factory::create_provider;
pub use fake::FakeProvider;
pub use provider::{
    GenerationConfig, LlmProvider, LlmResponse, LlmResult, Message, MessageRole,
    ProviderCharacteristics, StructuredResponse,
};
pub use structured::{schema_of, ConfidenceOutput, LayerScoreOutput, NarrativeOutput, RecommendationOutput};
