use thiserror::Error;

/// Errors raised by the graph query layer (component A).
///
/// `Unavailable` is retryable by the accessor itself; if retries are
/// exhausted it is surfaced to the calling stage, which degrades gracefully.
/// `SchemaMismatch` means the graph does not have the shape the core relies
/// on and is fatal for the whole batch.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("graph unavailable: {0}")]
    Unavailable(String),

    #[error("graph schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// Errors raised by the structured-output LLM adapter (component L).
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    #[error("llm unavailable after retries: {0}")]
    Unavailable(String),

    #[error("llm response violated its schema: {0}")]
    SchemaViolation(String),
}

/// Top-level pipeline error. Only `SchemaMismatch` (via `Fatal`) should ever
/// abort a batch; every other condition is handled as graceful degradation
/// on the technology's state record, never as a propagated `Err`.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    #[error("fatal: {0}")]
    Fatal(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<GraphError> for PipelineError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::SchemaMismatch(msg) => PipelineError::Fatal(msg),
            GraphError::Unavailable(msg) => PipelineError::Fatal(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
