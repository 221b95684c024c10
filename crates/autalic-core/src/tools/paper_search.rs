//! Tool that searches the AUTALIC paper text.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::AgentError;
use crate::llm::ToolMetadata;
use crate::paper::Paper;
use crate::tools::Tool;

pub struct PaperSearchTool {
    paper: Option<Arc<Paper>>,
}

impl PaperSearchTool {
    pub fn new(paper: Option<Arc<Paper>>) -> Self {
        Self { paper }
    }
}

#[async_trait]
impl Tool for PaperSearchTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "search_autalic_paper".to_string(),
            description: "Searches the AUTALIC paper summary to answer questions about the research, its findings, or its methodology.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Term or phrase to look for in the paper text"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<String, AgentError> {
        let Some(paper) = &self.paper else {
            return Ok("Paper content not loaded. Cannot search.".to_string());
        };

        let query = arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolError {
                tool_name: "search_autalic_paper".to_string(),
                message: "Missing or invalid 'query' parameter".to_string(),
            })?;

        Ok(paper.search(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn searches_the_loaded_paper() {
        let paper = Paper::from_content(
            "### 1. Overview\nAnnotators disagreed often.\n",
            "https://example.org/paper".to_string(),
        );
        let tool = PaperSearchTool::new(Some(Arc::new(paper)));
        let result = tool.execute(json!({"query": "disagreed"})).await.unwrap();
        assert!(result.contains("Annotators disagreed often."));
    }

    #[tokio::test]
    async fn missing_paper_degrades_to_advisory_string() {
        let tool = PaperSearchTool::new(None);
        let result = tool.execute(json!({"query": "anything"})).await.unwrap();
        assert_eq!(result, "Paper content not loaded. Cannot search.");
    }

    #[tokio::test]
    async fn missing_query_is_a_tool_error() {
        let paper = Paper::from_content("text\n", "https://example.org".to_string());
        let tool = PaperSearchTool::new(Some(Arc::new(paper)));
        let result = tool.execute(json!({})).await;
        assert!(matches!(result, Err(AgentError::ToolError { .. })));
    }
}
