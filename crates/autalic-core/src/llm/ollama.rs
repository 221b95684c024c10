//! Chat client for a local Ollama runtime.
//!
//! Talks to Ollama's `/api/chat` endpoint with streaming disabled, sending
//! the full message sequence plus OpenAI-style function definitions each
//! round trip. Ollama returns tool-call arguments as a JSON object rather
//! than an encoded string, but some proxies string-encode them, so the parser
//! accepts both.

use crate::core_types::{LLMResponse, Message, Role, ToolCall};
use crate::errors::AgentError;
use crate::llm::{ToolMetadata, LLM};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn build_request_body(&self, messages: &[Message], tools: Option<&[ToolMetadata]>) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.format_messages(messages),
            "stream": false,
        });

        if let Some(temp) = self.temperature {
            body["options"] = json!({ "temperature": temp });
        }

        if let Some(tools) = tools {
            if !tools.is_empty() {
                let formatted_tools: Vec<Value> = tools
                    .iter()
                    .map(|tool| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": tool.name,
                                "description": tool.description,
                                "parameters": tool.input_schema
                            }
                        })
                    })
                    .collect();
                body["tools"] = formatted_tools.into();
            }
        }

        body
    }

    fn format_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                let mut message = json!({
                    "role": self.format_role(&msg.role),
                    "content": msg.content
                });

                if let Role::Tool = msg.role {
                    if let Some(tool_call_id) = &msg.tool_call_id {
                        message["tool_call_id"] = json!(tool_call_id);
                    }
                }

                if let Role::Assistant = msg.role {
                    if let Some(tool_calls) = &msg.tool_calls {
                        if !tool_calls.is_empty() {
                            let formatted: Vec<Value> = tool_calls
                                .iter()
                                .map(|tc| {
                                    json!({
                                        "function": {
                                            "name": tc.name,
                                            "arguments": tc.arguments
                                        }
                                    })
                                })
                                .collect();
                            message["tool_calls"] = json!(formatted);
                        }
                    }
                }

                message
            })
            .collect()
    }

    fn format_role(&self, role: &Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    fn parse_response(&self, response: Value) -> Result<LLMResponse, AgentError> {
        let message = response
            .get("message")
            .ok_or_else(|| AgentError::ParsingError("No message in response".to_string()))?;

        let content = message["content"].as_str().map(|s| s.to_string());

        let tool_calls = if let Some(calls) = message["tool_calls"].as_array() {
            let mut parsed_calls = Vec::new();
            for call in calls {
                let function = call["function"].as_object().ok_or_else(|| {
                    AgentError::ParsingError("Tool call without a function object".to_string())
                })?;
                let name = function
                    .get("name")
                    .and_then(|n| n.as_str())
                    .ok_or_else(|| {
                        AgentError::ParsingError("Tool call without a name".to_string())
                    })?;

                // Arguments arrive as an object from Ollama proper, or as a
                // JSON-encoded string from OpenAI-compatible proxies.
                let arguments = match function.get("arguments") {
                    Some(Value::String(s)) => serde_json::from_str(s).map_err(|e| {
                        AgentError::ParsingError(format!("Invalid tool call arguments JSON: {}", e))
                    })?,
                    Some(other) => other.clone(),
                    None => json!({}),
                };

                parsed_calls.push(ToolCall {
                    id: call["id"].as_str().map(|s| s.to_string()),
                    name: name.to_string(),
                    arguments,
                });
            }
            if parsed_calls.is_empty() {
                None
            } else {
                Some(parsed_calls)
            }
        } else {
            None
        };

        if content.is_none() && tool_calls.is_none() {
            return Err(AgentError::ParsingError(
                "Response has neither content nor tool calls".to_string(),
            ));
        }

        Ok(LLMResponse {
            content,
            tool_calls,
        })
    }
}

#[async_trait]
impl LLM for OllamaClient {
    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<ToolMetadata>>,
    ) -> Result<LLMResponse, AgentError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.build_request_body(&messages, tools.as_deref());

        log::debug!("Ollama request to {} with {} messages", url, messages.len());

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::LLMError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| AgentError::LLMError(format!("Failed to read response: {}", e)))?;

        log::debug!("Ollama response ({}): {}", status, response_text);

        if !status.is_success() {
            return Err(AgentError::LLMError(format!(
                "API request failed with status {}: {}",
                status, response_text
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| AgentError::ParsingError(format!("Invalid JSON response: {}", e)))?;

        self.parse_response(response_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OllamaClient {
        OllamaClient::new("http://localhost:11434".to_string(), "qwen3:14b".to_string())
    }

    #[test]
    fn request_body_carries_model_messages_and_tools() {
        let tools = vec![ToolMetadata {
            name: "search_autalic_paper".to_string(),
            description: "Searches the paper".to_string(),
            input_schema: json!({"type": "object"}),
        }];
        let body = client().build_request_body(&[Message::user("hi")], Some(&tools));

        assert_eq!(body["model"], "qwen3:14b");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "search_autalic_paper");
    }

    #[test]
    fn assistant_tool_calls_are_replayed_to_the_model() {
        let assistant = Message {
            role: Role::Assistant,
            content: String::new(),
            tool_call_id: None,
            tool_calls: Some(vec![ToolCall {
                id: None,
                name: "get_sentence_examples".to_string(),
                arguments: json!({"category": "anti-autistic"}),
            }]),
        };
        let body = client().build_request_body(&[assistant], None);
        assert_eq!(
            body["messages"][0]["tool_calls"][0]["function"]["name"],
            "get_sentence_examples"
        );
    }

    #[test]
    fn parses_plain_text_reply() {
        let reply = client()
            .parse_response(json!({
                "message": {"role": "assistant", "content": "Hello there!"},
                "done": true
            }))
            .unwrap();
        assert_eq!(reply.content.as_deref(), Some("Hello there!"));
        assert!(!reply.requests_tools());
    }

    #[test]
    fn parses_tool_calls_with_object_arguments() {
        let reply = client()
            .parse_response(json!({
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{
                        "function": {
                            "name": "get_sentence_examples",
                            "arguments": {"category": "anti-autistic", "num_examples": 3}
                        }
                    }]
                }
            }))
            .unwrap();
        let calls = reply.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_sentence_examples");
        assert_eq!(calls[0].arguments["num_examples"], 3);
    }

    #[test]
    fn parses_tool_calls_with_string_arguments() {
        let reply = client()
            .parse_response(json!({
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{
                        "id": "call_0",
                        "function": {
                            "name": "search_autalic_paper",
                            "arguments": "{\"query\": \"annotators\"}"
                        }
                    }]
                }
            }))
            .unwrap();
        let calls = reply.tool_calls.unwrap();
        assert_eq!(calls[0].id.as_deref(), Some("call_0"));
        assert_eq!(calls[0].arguments["query"], "annotators");
    }

    #[test]
    fn rejects_reply_without_content_or_tools() {
        let result = client().parse_response(json!({"message": {"role": "assistant"}}));
        assert!(matches!(result, Err(AgentError::ParsingError(_))));
    }
}
