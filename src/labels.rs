use std::collections::HashMap;
use std::path::Path;

use crate::errors::{ClassifyError, Result};

/// Class names in model output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Err(ClassifyError::initialization(
                "label table construction",
                "label table is empty",
            ));
        }
        Ok(Self { labels })
    }

    /// Reads a JSON object mapping `"0"`..`"N-1"` to class names.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::initialization(format!("label file read: {}", path.display()), e)
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let mapping: HashMap<String, String> = serde_json::from_str(text)
            .map_err(|e| ClassifyError::initialization("label file parse", e))?;

        let labels = (0..mapping.len())
            .map(|index| {
                mapping.get(&index.to_string()).cloned().ok_or_else(|| {
                    ClassifyError::initialization(
                        "label file parse",
                        format!("missing label for index {index}"),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(labels)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
