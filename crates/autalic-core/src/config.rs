//! Configuration types and YAML loader.
//!
//! Every field has a serde default so a minimal (or absent) config file
//! yields a fully working setup pointed at a local Ollama runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::agent::DEFAULT_SYSTEM_PROMPT;
use crate::errors::AgentError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSection {
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default = "default_max_round_trips")]
    pub max_round_trips: usize,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
    #[serde(default = "default_paper_path")]
    pub paper_path: String,
    #[serde(default = "default_paper_url")]
    pub paper_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_agent_name() -> String {
    "AUTALIC Agent".to_string()
}

fn default_max_round_trips() -> usize {
    5
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "qwen3:14b".to_string()
}

fn default_dataset_path() -> String {
    "AUTALIC.csv".to_string()
}

fn default_paper_path() -> String {
    "data/autalic_paper.txt".to_string()
}

fn default_paper_url() -> String {
    "https://arxiv.org/abs/2410.16520".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            max_round_trips: default_max_round_trips(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: None,
        }
    }
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            paper_path: default_paper_path(),
            paper_url: default_paper_url(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from a YAML file. A missing file is not an error;
    /// it yields the defaulted configuration.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<AppConfig, AgentError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            AgentError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<AppConfig, AgentError> {
        serde_yaml::from_str(content)
            .map_err(|e| AgentError::ConfigError(format!("Failed to parse YAML config: {}", e)))
    }
}
