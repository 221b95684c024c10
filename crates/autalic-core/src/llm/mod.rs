//! Model transport abstraction.
//!
//! Defines the `LLM` trait the agent loop talks through, plus the metadata
//! shape used to advertise local tools to the model. The concrete transport
//! for this service is a local Ollama runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core_types::{LLMResponse, Message};
use crate::errors::AgentError;

pub mod ollama;

pub use ollama::OllamaClient;

/// A tool definition advertised to the model: name, free-text description,
/// and a JSON schema for the arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[async_trait]
pub trait LLM: Send + Sync {
    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<ToolMetadata>>,
    ) -> Result<LLMResponse, AgentError>;
}
