pub mod builder;
pub mod patch;
pub mod sweep;

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use crate::error::{Result, SweepError};

pub use patch::{LabelSummary, Patch};
pub use sweep::{AxisEntry, PromptKeyword, PromptKeywords, SweepConfig, SweepValue};

/// Workflow graph as exported by the generation service's API format:
/// node-id -> node. Node ids are opaque; nodes are addressed by title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WorkflowGraph {
    pub nodes: BTreeMap<String, GraphNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    #[serde(default)]
    pub class_type: String,
    #[serde(default)]
    pub inputs: Map<String, Value>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<NodeMeta>,
    /// Fields this tool does not interpret, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphNode {
    /// Human-assigned title, `None` when missing or empty.
    pub fn title(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// Address of one node input: `"<node title>/<input name>"`.
///
/// The title never contains `/`; the input name may.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FullKey {
    title: String,
    input: String,
}

impl FullKey {
    pub fn new(title: impl Into<String>, input: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let input = input.into();
        let key = format!("{}/{}", title, input);
        if title.is_empty() {
            return Err(SweepError::InvalidKey { key, reason: "empty node title" });
        }
        if title.contains('/') {
            return Err(SweepError::InvalidKey { key, reason: "node title contains '/'" });
        }
        if input.is_empty() {
            return Err(SweepError::InvalidKey { key, reason: "empty input name" });
        }
        Ok(Self { title, input })
    }

    /// Splits on the first `/`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (title, input) = raw.split_once('/').ok_or_else(|| SweepError::InvalidKey {
            key: raw.to_string(),
            reason: "missing '/' separator",
        })?;
        Self::new(title, input)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for FullKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.title, self.input)
    }
}

/// Everything before the last `/` of a config key.
pub fn key_base(key: &str) -> Option<&str> {
    key.rsplit_once('/').map(|(base, _)| base)
}

/// Last path segment of a config key, used as its label when none is set.
pub fn key_leaf(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
