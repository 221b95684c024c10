//! The bounded tool-calling loop.
//!
//! Each turn runs at most `max_round_trips` model calls. A round trip submits
//! the system prompt plus the accumulated messages with the registered tool
//! definitions, appends the reply unconditionally, then either finishes (the
//! reply carried no tool calls) or dispatches every requested call in order
//! and feeds the results back as tool messages before the next trip.
//!
//! `Agent::run` never propagates an error: transport failures, exhausted
//! bounds, and anything unexpected all come back as displayable reply text.
//! Intermediate tool traffic lives only in the run's working copy; callers
//! persist just the user turn and the final reply.

use std::sync::Arc;

use crate::core_types::{Message, Role, ToolCall};
use crate::errors::AgentError;
use crate::llm::LLM;
use crate::tools::ToolRegistry;

/// Persona and behavioral modes, prepended transiently on every run.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are the AUTALIC Agent, a friendly and helpful conversational AI created by Naba Rizvi. \
Your primary roles are:
1. To analyze sentences for anti-autistic ableism.
2. To answer questions about the AUTALIC research paper.
3. To engage in friendly, general conversation.

When a user provides a sentence for analysis, you MUST use your tools if needed and then \
respond with a single, valid JSON object containing 'classification' and 'confidence' keys. \
Do not add any conversational text to the JSON response.
When a user asks a question about the AUTALIC paper, you MUST use the `search_autalic_paper` \
tool to find the relevant information and then answer in a clear, conversational, and helpful manner.
For all other interactions (greetings, general chat), just be a friendly conversationalist. \
Do not try to analyze these messages or use tools unless explicitly asked.";

const EXHAUSTED_REPLY: &str =
    "I seem to be having trouble using my tools right now. Please try again.";
const INTERNAL_FAILURE_REPLY: &str =
    "Something went wrong on my end while handling that. Please try again.";

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum model calls per user turn.
    pub max_round_trips: usize,
    pub system_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_round_trips: 5,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Outcome of one model round trip.
enum RoundTrip {
    /// The reply was plain text; the loop is done.
    Done(String),
    /// The reply requested tool calls that still need dispatching.
    ToolsRequested(Vec<ToolCall>),
}

pub struct Agent {
    llm: Arc<dyn LLM>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Agent {
    pub fn new(llm: Arc<dyn LLM>, tools: ToolRegistry, config: AgentConfig) -> Self {
        Agent { llm, tools, config }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Runs one user turn against the supplied history and returns reply
    /// text. Infallible at this boundary: every failure mode is converted to
    /// something the user can read.
    pub async fn run(&self, history: &[Message]) -> String {
        match self.run_inner(history).await {
            Ok(reply) => reply,
            Err(AgentError::LLMError(detail)) => {
                log::error!("Model backend failure: {}", detail);
                format!("I couldn't reach the language model backend: {}", detail)
            }
            Err(e) => {
                log::error!("Unexpected agent failure: {}", e);
                INTERNAL_FAILURE_REPLY.to_string()
            }
        }
    }

    async fn run_inner(&self, history: &[Message]) -> Result<String, AgentError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(&self.config.system_prompt));
        messages.extend_from_slice(history);

        for trip in 0..self.config.max_round_trips {
            log::info!("Round trip {}/{}", trip + 1, self.config.max_round_trips);
            match self.round_trip(&mut messages).await? {
                RoundTrip::Done(reply) => return Ok(reply),
                RoundTrip::ToolsRequested(calls) => {
                    self.dispatch_all(calls, &mut messages).await;
                }
            }
        }

        log::warn!(
            "Reached max_round_trips ({}) without a plain reply",
            self.config.max_round_trips
        );
        Ok(EXHAUSTED_REPLY.to_string())
    }

    /// One submission to the model. The reply message is appended to the
    /// sequence unconditionally, even when it only carries tool calls.
    async fn round_trip(&self, messages: &mut Vec<Message>) -> Result<RoundTrip, AgentError> {
        let tool_metadata = self.tools.list_tools();
        let reply = self
            .llm
            .generate(messages.clone(), Some(tool_metadata))
            .await?;

        let content = reply.content.clone().unwrap_or_default();
        messages.push(Message {
            role: Role::Assistant,
            content: content.clone(),
            tool_call_id: None,
            tool_calls: reply.tool_calls.clone(),
        });

        if reply.requests_tools() {
            // requests_tools() guarantees the list is non-empty here
            Ok(RoundTrip::ToolsRequested(reply.tool_calls.unwrap_or_default()))
        } else {
            Ok(RoundTrip::Done(content))
        }
    }

    /// Dispatches every requested call in the order the model gave and
    /// appends a tool message per result. Tool failures are already in-band
    /// text by the time the registry returns.
    async fn dispatch_all(&self, calls: Vec<ToolCall>, messages: &mut Vec<Message>) {
        for call in calls {
            let result = self.tools.dispatch(&call).await;
            messages.push(Message::tool_result(result, call.id.clone()));
        }
    }
}
