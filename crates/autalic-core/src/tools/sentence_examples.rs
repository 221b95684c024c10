//! Tool that samples labeled sentences from the AUTALIC dataset.
//!
//! Degraded modes (missing dataset, unknown category, empty category) are
//! reported as descriptive result strings rather than errors so the model can
//! explain the situation instead of retrying blindly.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::dataset::{Category, Dataset};
use crate::errors::AgentError;
use crate::llm::ToolMetadata;
use crate::tools::Tool;

const DEFAULT_NUM_EXAMPLES: usize = 3;

pub struct SentenceExamplesTool {
    dataset: Option<Arc<Dataset>>,
}

impl SentenceExamplesTool {
    pub fn new(dataset: Option<Arc<Dataset>>) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl Tool for SentenceExamplesTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "get_sentence_examples".to_string(),
            description: "Get example sentences from the AUTALIC dataset to inform an analysis of anti-autistic language.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "enum": ["anti-autistic", "not-anti-autistic"],
                        "description": "Which annotator-agreement category to sample from"
                    },
                    "num_examples": {
                        "type": "integer",
                        "default": DEFAULT_NUM_EXAMPLES,
                        "description": "How many sentences to return"
                    }
                },
                "required": ["category"]
            }),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<String, AgentError> {
        let Some(dataset) = &self.dataset else {
            return Ok("Dataset not loaded. Cannot provide examples.".to_string());
        };

        let category_label = arguments
            .get("category")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolError {
                tool_name: "get_sentence_examples".to_string(),
                message: "Missing or invalid 'category' parameter".to_string(),
            })?;

        let category = match Category::parse(category_label) {
            Ok(category) => category,
            // Invalid labels are an error value for the model, not a failure.
            Err(AgentError::ParsingError(msg)) => return Ok(msg),
            Err(e) => return Ok(e.to_string()),
        };

        let num_examples = arguments
            .get("num_examples")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_NUM_EXAMPLES);

        let sentences = dataset.sample(category, num_examples);
        if sentences.is_empty() {
            return Ok(format!("No examples found for category: {}", category));
        }

        serde_json::to_string(&sentences).map_err(|e| AgentError::ToolError {
            tool_name: "get_sentence_examples".to_string(),
            message: format!("Failed to encode examples: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
sentence,A1,A2,A3
You don't look autistic at all,1,1,0
Support autistic-led research,0,0,1
";

    fn tool() -> SentenceExamplesTool {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        SentenceExamplesTool::new(Some(Arc::new(dataset)))
    }

    #[tokio::test]
    async fn returns_sentences_for_a_valid_category() {
        let result = tool()
            .execute(json!({"category": "anti-autistic", "num_examples": 5}))
            .await
            .unwrap();
        let sentences: Vec<String> = serde_json::from_str(&result).unwrap();
        assert_eq!(sentences, vec!["You don't look autistic at all"]);
    }

    #[tokio::test]
    async fn invalid_category_is_a_result_string_not_an_error() {
        let result = tool().execute(json!({"category": "neutral"})).await.unwrap();
        assert!(result.contains("Invalid category: neutral"));
    }

    #[tokio::test]
    async fn missing_category_is_a_tool_error() {
        let result = tool().execute(json!({"num_examples": 2})).await;
        assert!(matches!(result, Err(AgentError::ToolError { .. })));
    }

    #[tokio::test]
    async fn num_examples_defaults_to_three() {
        let csv = "sentence,A1,A2,A3\na,1,1,0\nb,1,1,1\nc,1,0,1\nd,1,1,0\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let tool = SentenceExamplesTool::new(Some(Arc::new(dataset)));
        let result = tool.execute(json!({"category": "anti-autistic"})).await.unwrap();
        let sentences: Vec<String> = serde_json::from_str(&result).unwrap();
        assert_eq!(sentences.len(), 3);
    }

    #[tokio::test]
    async fn missing_dataset_degrades_to_advisory_string() {
        let tool = SentenceExamplesTool::new(None);
        let result = tool.execute(json!({"category": "anti-autistic"})).await.unwrap();
        assert_eq!(result, "Dataset not loaded. Cannot provide examples.");
    }

    #[tokio::test]
    async fn empty_category_reports_no_examples() {
        let csv = "sentence,A1,A2,A3\nonly positive examples here,0,0,0\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let tool = SentenceExamplesTool::new(Some(Arc::new(dataset)));
        let result = tool.execute(json!({"category": "anti-autistic"})).await.unwrap();
        assert_eq!(result, "No examples found for category: anti-autistic");
    }
}
