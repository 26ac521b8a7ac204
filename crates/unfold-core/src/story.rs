//! Section stores and the JSON story document.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};

/// Read-only lookup of raw section markup by id.
///
/// The engine never writes to a store; expansion works on copies.
pub trait SectionStore {
    /// Raw markup of a section, or `None` if it does not exist.
    fn section(&self, id: &str) -> Option<&str>;

    /// All section ids, in a stable order.
    fn section_ids(&self) -> Vec<&str>;
}

impl SectionStore for BTreeMap<String, String> {
    fn section(&self, id: &str) -> Option<&str> {
        self.get(id).map(String::as_str)
    }

    fn section_ids(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl SectionStore for HashMap<String, String> {
    fn section(&self, id: &str) -> Option<&str> {
        self.get(id).map(String::as_str)
    }

    fn section_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// A compiled story: sections plus initial variables and engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    /// Human-readable title.
    pub title: String,
    /// Section shown first.
    pub start: String,
    /// Section id → raw markup.
    pub sections: BTreeMap<String, String>,
    /// Initial variable values.
    #[serde(default)]
    pub variables: BTreeMap<String, serde_json::Value>,
    /// Engine settings.
    #[serde(default)]
    pub config: EngineConfig,
}

impl Story {
    /// Create an empty story starting at `start`.
    pub fn new(title: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            sections: BTreeMap::new(),
            variables: BTreeMap::new(),
            config: EngineConfig::default(),
        }
    }

    /// Builder: add a section.
    pub fn with_section(mut self, id: impl Into<String>, markup: impl Into<String>) -> Self {
        self.sections.insert(id.into(), markup.into());
        self
    }

    /// Builder: add an initial variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Parse and validate a story from JSON text.
    pub fn from_json(source: &str) -> CoreResult<Self> {
        let story: Story = serde_json::from_str(source)?;
        story.validate()?;
        Ok(story)
    }

    /// Load and validate a story file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if self.sections.is_empty() {
            return Err(CoreError::NoSections);
        }
        if self.sections.keys().any(|id| id.is_empty()) {
            return Err(CoreError::EmptySectionId);
        }
        if !self.sections.contains_key(&self.start) {
            return Err(CoreError::MissingStartSection(self.start.clone()));
        }
        Ok(())
    }
}

impl SectionStore for Story {
    fn section(&self, id: &str) -> Option<&str> {
        self.sections.section(id)
    }

    fn section_ids(&self) -> Vec<&str> {
        self.sections.section_ids()
    }
}
