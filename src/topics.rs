//! Canned-answer topic table
//!
//! A read-only lookup from topic id to its menu label and scripted response.
//! Every table carries a `fallback` entry which answers for any id it
//! doesn't know, so lookups never fail.

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Id of the entry used for unknown topic ids
pub const FALLBACK_ID: &str = "fallback";

const BUILTIN_FILE: &str = "topics.json";

#[derive(Embed)]
#[folder = "data/"]
struct BuiltinData;

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("Failed to read topic table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid topic table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Built-in topic table is missing")]
    MissingBuiltin,
    #[error("Topic table has no \"fallback\" entry")]
    MissingFallback,
    #[error("Duplicate topic id: {0}")]
    DuplicateId(String),
}

/// One selectable menu topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    /// Menu button text, echoed as the visitor's message when selected
    #[serde(rename = "label")]
    pub display_label: String,
    /// Icon name understood by the widget front end
    pub icon: String,
    pub response: String,
}

/// Topic lookup table with a guaranteed fallback entry
#[derive(Debug, Clone)]
pub struct TopicTable {
    /// Menu order, fallback excluded
    topics: Vec<Topic>,
    index: HashMap<String, usize>,
    fallback: Topic,
}

impl TopicTable {
    /// The table shipped with the widget
    ///
    /// # Errors
    ///
    /// Fails only if the embedded file is missing or malformed.
    pub fn builtin() -> Result<Self, TopicError> {
        let file = BuiltinData::get(BUILTIN_FILE).ok_or(TopicError::MissingBuiltin)?;
        let table: Vec<Topic> = serde_json::from_slice(&file.data)?;
        Self::from_topics(table)
    }

    /// Load a replacement table from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`TopicError::Io`] if the file can't be read, otherwise as
    /// [`TopicTable::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopicError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// # Errors
    ///
    /// Returns [`TopicError::Json`] for invalid JSON, otherwise as
    /// [`TopicTable::from_topics`].
    pub fn from_json(raw: &str) -> Result<Self, TopicError> {
        let table: Vec<Topic> = serde_json::from_str(raw)?;
        Self::from_topics(table)
    }

    /// Build a table, keeping the given order for the menu.
    ///
    /// # Errors
    ///
    /// Returns [`TopicError::DuplicateId`] when an id repeats and
    /// [`TopicError::MissingFallback`] when no `fallback` entry is present.
    pub fn from_topics(table: impl IntoIterator<Item = Topic>) -> Result<Self, TopicError> {
        let mut seen = HashSet::new();
        let mut topics = Vec::new();
        let mut fallback = None;

        for topic in table {
            if !seen.insert(topic.id.clone()) {
                return Err(TopicError::DuplicateId(topic.id));
            }
            if topic.id == FALLBACK_ID {
                fallback = Some(topic);
            } else {
                topics.push(topic);
            }
        }

        let fallback = fallback.ok_or(TopicError::MissingFallback)?;
        let index = topics
            .iter()
            .enumerate()
            .map(|(i, topic)| (topic.id.clone(), i))
            .collect();

        Ok(Self {
            topics,
            index,
            fallback,
        })
    }

    /// Exact lookup. `"fallback"` resolves to the fallback entry.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Topic> {
        if id == FALLBACK_ID {
            return Some(&self.fallback);
        }
        self.index.get(id).map(|&i| &self.topics[i])
    }

    /// Lookup that falls back instead of failing
    #[must_use]
    pub fn resolve(&self, id: &str) -> &Topic {
        self.get(id).unwrap_or(&self.fallback)
    }

    #[must_use]
    pub fn fallback(&self) -> &Topic {
        &self.fallback
    }

    /// Selectable topics in menu order
    #[must_use]
    pub fn menu(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
