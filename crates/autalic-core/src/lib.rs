//! Core library for the AUTALIC conversational agent.
//!
//! This crate provides everything behind the HTTP surface: the message and
//! tool-call types shared with the model transport, the Ollama chat client,
//! the two local tools (dataset examples and paper search) with their
//! registry, the bounded tool-calling loop that orchestrates them, and the
//! keyed session store that replaces a single shared history.
//!
//! The agent answers three kinds of traffic: sentence analysis for
//! anti-autistic ableism (structured JSON replies backed by dataset
//! examples), questions about the AUTALIC research paper (backed by a
//! line-oriented search over the paper text), and plain conversation.

pub mod agent;
pub mod config;
pub mod core_types;
pub mod dataset;
pub mod errors;
pub mod llm;
pub mod paper;
pub mod session;
pub mod tools;

pub use agent::{Agent, AgentConfig};
pub use config::{AppConfig, ConfigLoader};
pub use core_types::{LLMResponse, Message, Role, ToolCall};
pub use dataset::{Category, Dataset};
pub use errors::AgentError;
pub use llm::{OllamaClient, ToolMetadata, LLM};
pub use paper::Paper;
pub use session::SessionStore;
pub use tools::{PaperSearchTool, SentenceExamplesTool, Tool, ToolRegistry};
