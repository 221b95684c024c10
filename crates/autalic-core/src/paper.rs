//! Accessor for the AUTALIC paper text.
//!
//! The paper is a flat text file with markdown-style `### N. Title` heading
//! lines. Vague queries ("the paper", "autalic", ...) get the summary
//! section, the body of the first heading. Everything else is a
//! case-insensitive line scan. A miss is answered with a pointer to the
//! published paper rather than an error; search never fails outright.

use std::path::Path;

use regex::RegexBuilder;

use crate::errors::AgentError;

/// Queries that ask about the paper as a whole rather than any detail.
const VAGUE_QUERIES: &[&str] = &[
    "autalic",
    "paper",
    "the paper",
    "autalic paper",
    "the autalic paper",
    "publication",
    "the publication",
    "article",
];

const HEADING_MARKER: &str = "### ";

pub struct Paper {
    lines: Vec<String>,
    url: String,
}

impl Paper {
    pub fn load<P: AsRef<Path>>(path: P, url: String) -> Result<Self, AgentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentError::IoError(format!("Failed to read paper {}: {}", path.display(), e))
        })?;
        log::info!("Loaded paper text from {}", path.display());
        Ok(Self::from_content(&content, url))
    }

    pub fn from_content(content: &str, url: String) -> Self {
        Paper {
            lines: content.lines().map(|l| l.to_string()).collect(),
            url,
        }
    }

    /// Answers a query against the paper. Always returns displayable text.
    pub fn search(&self, query: &str) -> String {
        let normalized = query.trim().to_lowercase();

        if VAGUE_QUERIES.contains(&normalized.as_str()) {
            if let Some(section) = self.summary_section() {
                return section;
            }
            log::debug!("No summary heading found, falling back to line search");
        }

        let matches = self.matching_lines(&normalized);
        if matches.is_empty() {
            format!(
                "No information found for '{}' in the paper summary. The full paper is available at {}.",
                query.trim(),
                self.url
            )
        } else {
            matches.join("\n")
        }
    }

    /// Body of the first `### ` heading: every non-blank line up to the next
    /// heading or end of document.
    fn summary_section(&self) -> Option<String> {
        let start = self
            .lines
            .iter()
            .position(|line| line.starts_with(HEADING_MARKER))?;

        let body: Vec<&str> = self.lines[start + 1..]
            .iter()
            .take_while(|line| !line.starts_with(HEADING_MARKER))
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.as_str())
            .collect();

        if body.is_empty() {
            None
        } else {
            Some(body.join("\n"))
        }
    }

    /// Case-insensitive per-line regex match, in original order. An invalid
    /// pattern degrades to a literal substring scan so a creative model query
    /// never turns into an error.
    fn matching_lines(&self, query: &str) -> Vec<String> {
        match RegexBuilder::new(query).case_insensitive(true).build() {
            Ok(re) => self
                .lines
                .iter()
                .filter(|line| re.is_match(line))
                .cloned()
                .collect(),
            Err(_) => {
                log::debug!("Query '{}' is not a valid regex, using substring scan", query);
                self.lines
                    .iter()
                    .filter(|line| line.to_lowercase().contains(query))
                    .cloned()
                    .collect()
            }
        }
    }
}
