use thiserror::Error;

/// Failures talking to the hosted language model. Any of these means the
/// search could not be interpreted at all.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM client config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("LLM API error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}
