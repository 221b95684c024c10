//! Wire types shared between the agent loop and the model transport.
//!
//! These structures form the contract with the chat-completion endpoint and
//! follow the OpenAI-style function-calling shape that Ollama also speaks:
//! an ordered message sequence in, one reply message out that may carry plain
//! text and/or a list of requested tool calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// A tool-result message, carrying the id of the call it answers when the
    /// model supplied one.
    pub fn tool_result(content: impl Into<String>, tool_call_id: Option<String>) -> Self {
        Message {
            role: Role::Tool,
            content: content.into(),
            tool_call_id,
            tool_calls: None,
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

/// A model-requested invocation of a named local function.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCall {
    pub id: Option<String>,
    pub name: String,
    pub arguments: Value,
}

/// One reply message from the chat endpoint. Either field may be absent,
/// but a reply carrying neither is rejected by the transport layer.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LLMResponse {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl LLMResponse {
    /// True when the reply requests at least one tool invocation.
    pub fn requests_tools(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_serialization_skips_empty_tool_fields() {
        let msg = Message::user("hello");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn tool_result_carries_call_id() {
        let msg = Message::tool_result("42", Some("call_1".to_string()));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_1");
    }

    #[test]
    fn empty_tool_call_list_does_not_request_tools() {
        let reply = LLMResponse {
            content: Some("done".to_string()),
            tool_calls: Some(vec![]),
        };
        assert!(!reply.requests_tools());

        let reply = LLMResponse {
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: None,
                name: "search_autalic_paper".to_string(),
                arguments: json!({"query": "annotators"}),
            }]),
        };
        assert!(reply.requests_tools());
    }
}
