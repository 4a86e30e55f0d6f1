//! Metadata filters for vector store lookups

use std::collections::HashMap;

use serde_json::Value;

/// Predicate on one metadata key
///
/// Values compare by JSON equality, so an integer never matches its string form.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataFilter {
    /// The key holds exactly this value
    Eq { key: String, value: Value },
    /// The key holds one of these values; an empty list matches nothing
    In { key: String, values: Vec<Value> },
}

impl MetadataFilter {
    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn in_list<V: Into<Value>>(
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Restrict records to a single file
    pub fn file_id(file_id: i64) -> Self {
        Self::eq("file_id", file_id)
    }

    /// Restrict records to any of the given files
    pub fn file_ids(file_ids: impl IntoIterator<Item = i64>) -> Self {
        Self::in_list("file_id", file_ids)
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Eq { key, .. } | Self::In { key, .. } => key,
        }
    }

    /// Evaluate against record metadata; a missing key never matches
    pub fn matches(&self, metadata: &HashMap<String, Value>) -> bool {
        let Some(stored) = metadata.get(self.key()) else {
            return false;
        };

        match self {
            Self::Eq { value, .. } => stored == value,
            Self::In { values, .. } => values.contains(stored),
        }
    }
}
