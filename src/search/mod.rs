pub mod compiler;
pub mod descriptor;
pub mod fusion;
pub mod interpreter;
pub mod llm;
mod llm_error;
pub mod prompt;
pub mod service;

pub use llm::{LanguageModel, OpenAiChatModel};
pub use llm_error::LlmError;
pub use service::{SearchOutcome, SearchService};
