//! Accessor for the AUTALIC sentence dataset.
//!
//! The dataset is a CSV of sentences with three independent binary annotator
//! scores. Category membership is computed from annotator agreement, never
//! stored: a sentence is anti-autistic when at least two annotators scored it
//! 1, not-anti-autistic when at least two scored it 0. Mixed rows satisfy
//! neither rule and belong to no category; that asymmetry is deliberate and
//! preserved from the published annotation scheme.

use std::fmt;
use std::path::Path;

use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::errors::AgentError;

/// One of the two annotator-agreement labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    AntiAutistic,
    NotAntiAutistic,
}

impl Category {
    /// Parses a model-supplied label. Anything outside the two known labels
    /// is a descriptive error value, never a panic.
    pub fn parse(label: &str) -> Result<Self, AgentError> {
        match label {
            "anti-autistic" => Ok(Category::AntiAutistic),
            "not-anti-autistic" => Ok(Category::NotAntiAutistic),
            other => Err(AgentError::ParsingError(format!(
                "Invalid category: {}. Please use 'anti-autistic' or 'not-anti-autistic'.",
                other
            ))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::AntiAutistic => write!(f, "anti-autistic"),
            Category::NotAntiAutistic => write!(f, "not-anti-autistic"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    pub sentence: String,
    #[serde(rename = "A1")]
    pub a1: i8,
    #[serde(rename = "A2")]
    pub a2: i8,
    #[serde(rename = "A3")]
    pub a3: i8,
}

impl DatasetRow {
    fn scores(&self) -> [i8; 3] {
        [self.a1, self.a2, self.a3]
    }

    /// At least two of the three annotators scored the sentence 1.
    pub fn is_anti_autistic(&self) -> bool {
        self.scores().iter().filter(|s| **s == 1).count() >= 2
    }

    /// At least two of the three annotators scored the sentence 0.
    pub fn is_not_anti_autistic(&self) -> bool {
        self.scores().iter().filter(|s| **s == 0).count() >= 2
    }

    pub fn matches(&self, category: Category) -> bool {
        match category {
            Category::AntiAutistic => self.is_anti_autistic(),
            Category::NotAntiAutistic => self.is_not_anti_autistic(),
        }
    }
}

/// In-memory view of the labeled sentence table, loaded once at start-up.
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AgentError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            AgentError::IoError(format!("Failed to open dataset {}: {}", path.display(), e))
        })?;
        let dataset = Self::from_reader(file)?;
        log::info!(
            "Loaded {} dataset rows from {}",
            dataset.rows.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, AgentError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        let mut skipped = 0_usize;
        for record in csv_reader.deserialize::<DatasetRow>() {
            match record {
                Ok(row) => rows.push(row),
                Err(e) => {
                    skipped += 1;
                    log::warn!("Skipping malformed dataset row: {}", e);
                }
            }
        }
        if skipped > 0 {
            log::warn!("Skipped {} malformed dataset rows", skipped);
        }
        Ok(Dataset { rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Up to `count` sentences from the category, sampled without
    /// replacement. Fewer matches than `count` returns exactly the matches,
    /// no duplication or padding.
    pub fn sample(&self, category: Category, count: usize) -> Vec<String> {
        let matching: Vec<&DatasetRow> =
            self.rows.iter().filter(|row| row.matches(category)).collect();
        let mut rng = rand::thread_rng();
        matching
            .choose_multiple(&mut rng, count.min(matching.len()))
            .map(|row| row.sentence.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
sentence,A1,A2,A3
\"Autistic people are a burden, honestly\",1,1,0
Autistic voices deserve to be heard,0,0,1
That meeting ran long,1,0,0
\"Stop acting so autistic, it's embarrassing\",1,1,1
She wrote her thesis on annotator agreement,0,0,0
";

    fn dataset() -> Dataset {
        Dataset::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn category_parse_rejects_unknown_labels() {
        assert!(Category::parse("anti-autistic").is_ok());
        assert!(Category::parse("not-anti-autistic").is_ok());
        let err = Category::parse("neutral").unwrap_err();
        assert!(err.to_string().contains("Invalid category: neutral"));
    }

    #[test]
    fn majority_agreement_decides_membership() {
        let rows = &dataset().rows;
        // (1,1,0) -> anti-autistic
        assert!(rows[0].is_anti_autistic());
        assert!(!rows[0].is_not_anti_autistic());
        // (0,0,1) -> not-anti-autistic
        assert!(rows[1].is_not_anti_autistic());
        assert!(!rows[1].is_anti_autistic());
        // (1,1,1) and (0,0,0) are unanimous
        assert!(rows[3].is_anti_autistic());
        assert!(rows[4].is_not_anti_autistic());
    }

    #[test]
    fn mixed_rows_belong_to_neither_category() {
        let row = &dataset().rows[2]; // (1,0,0)
        assert!(!row.is_anti_autistic());
        // (1,0,0) has two zeros, so it does land in not-anti-autistic
        assert!(row.is_not_anti_autistic());

        let row = DatasetRow {
            sentence: "scores outside the binary range".to_string(),
            a1: 1,
            a2: 0,
            a3: 2,
        };
        assert!(!row.is_anti_autistic());
        assert!(!row.is_not_anti_autistic());
    }

    #[test]
    fn oversized_sample_returns_exactly_the_matches() {
        let sentences = dataset().sample(Category::AntiAutistic, 100);
        assert_eq!(sentences.len(), 2);
        // No duplication: both distinct anti-autistic sentences are present.
        assert_ne!(sentences[0], sentences[1]);
    }

    #[test]
    fn sample_respects_requested_count() {
        let sentences = dataset().sample(Category::NotAntiAutistic, 1);
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn empty_match_set_samples_to_nothing() {
        let ds = Dataset::from_reader("sentence,A1,A2,A3\nfine either way,1,0,2\n".as_bytes())
            .unwrap();
        assert!(ds.sample(Category::AntiAutistic, 3).is_empty());
        assert!(ds.sample(Category::NotAntiAutistic, 3).is_empty());
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let ds = Dataset::from_reader(
            "sentence,A1,A2,A3\ngood row,1,1,0\nbad row,one,1,0\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
    }
}
