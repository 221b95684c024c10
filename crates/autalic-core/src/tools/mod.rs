//! Tool system: the trait the agent dispatches through and the registry of
//! local functions advertised to the model.
//!
//! Dispatch is a containment boundary. An unknown tool name or a failure
//! inside a tool becomes ordinary tool-result text fed back into the
//! conversation so the model can react; errors never propagate past here.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core_types::ToolCall;
use crate::errors::AgentError;
use crate::llm::ToolMetadata;

pub mod paper_search;
pub mod sentence_examples;

pub use paper_search::PaperSearchTool;
pub use sentence_examples::SentenceExamplesTool;

#[async_trait]
pub trait Tool: Send + Sync {
    fn metadata(&self) -> ToolMetadata;
    async fn execute(&self, arguments: Value) -> Result<String, AgentError>;
}

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.metadata().name.clone();
        self.tools.insert(name, tool);
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.tools.values().map(|tool| tool.metadata()).collect()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Executes a model-requested call and returns the result as tool-result
    /// text. Lookup misses and execution failures are reported in-band.
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        let Some(tool) = self.get_tool(&call.name) else {
            let msg = format!("Unknown tool: {}", call.name);
            log::warn!("{}", msg);
            return msg;
        };

        log::info!("Dispatching tool '{}' with args {}", call.name, call.arguments);
        match tool.execute(call.arguments.clone()).await {
            Ok(content) => content,
            Err(e) => {
                let msg = format!("Tool '{}' execution failed: {}", call.name, e);
                log::error!("{}", msg);
                msg
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
