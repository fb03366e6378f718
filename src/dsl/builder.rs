use crate::dsl::{AxisEntry, GraphNode, NodeMeta, PromptKeyword, PromptKeywords, SweepConfig, SweepValue, WorkflowGraph};
use serde_json::{Map, Value};

/// Fluent construction of workflow graphs.
pub struct GraphBuilder {
    pub nodes: Vec<(String, GraphNode)>, // public so tests can tweak nodes before build
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Starts a titled node; finish it with `NodeBuilder::build`.
    pub fn node(self, id: &str, class_type: &str, title: &str) -> NodeBuilder {
        NodeBuilder {
            graph_builder: self,
            id: id.to_string(),
            class_type: class_type.to_string(),
            title: Some(title.to_string()),
            inputs: Map::new(),
        }
    }

    /// Starts a node without `_meta.title`.
    pub fn untitled(self, id: &str, class_type: &str) -> NodeBuilder {
        NodeBuilder {
            graph_builder: self,
            id: id.to_string(),
            class_type: class_type.to_string(),
            title: None,
            inputs: Map::new(),
        }
    }

    pub fn build(self) -> WorkflowGraph {
        WorkflowGraph {
            nodes: self.nodes.into_iter().collect(),
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct NodeBuilder {
    graph_builder: GraphBuilder,
    id: String,
    class_type: String,
    title: Option<String>,
    inputs: Map<String, Value>,
}

impl NodeBuilder {
    pub fn input(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.inputs.insert(name.to_string(), value.into());
        self
    }

    pub fn build(mut self) -> GraphBuilder {
        let meta = self.title.map(|title| NodeMeta {
            title: Some(title),
            extra: Map::new(),
        });
        self.graph_builder.nodes.push((
            self.id,
            GraphNode {
                class_type: self.class_type,
                inputs: self.inputs,
                meta,
                extra: Map::new(),
            },
        ));
        self.graph_builder
    }
}

/// Fluent construction of sweep configs, keeping axis order.
pub struct SweepBuilder {
    config: SweepConfig,
}

impl SweepBuilder {
    pub fn new() -> Self {
        Self { config: SweepConfig::new() }
    }

    pub fn axis(self, key: &str) -> AxisBuilder {
        AxisBuilder {
            sweep_builder: self,
            key: key.to_string(),
            label: None,
            values: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn build(self) -> SweepConfig {
        self.config
    }
}

impl Default for SweepBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AxisBuilder {
    sweep_builder: SweepBuilder,
    key: String,
    label: Option<String>,
    values: Vec<SweepValue>,
    keywords: Vec<PromptKeyword>,
}

impl AxisBuilder {
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Adds a candidate, read with the same rules as the config file.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(SweepValue::from_candidate(value.into()));
        self
    }

    pub fn off(mut self) -> Self {
        self.values.push(SweepValue::Off);
        self
    }

    pub fn resolution(mut self, width: u64, height: u64) -> Self {
        self.values.push(SweepValue::Resolution {
            width: Value::from(width),
            height: Value::from(height),
        });
        self
    }

    pub fn keyword(mut self, prompt_name: &str, prompt_text: &str) -> Self {
        self.keywords.push(PromptKeyword {
            prompt_name: prompt_name.to_string(),
            prompt_text: prompt_text.to_string(),
        });
        self
    }

    pub fn build(mut self) -> SweepBuilder {
        let prompt_keyword = match self.keywords.len() {
            0 => None,
            1 => self.keywords.pop().map(PromptKeywords::One),
            _ => Some(PromptKeywords::Many(self.keywords)),
        };
        self.sweep_builder.config.axes.insert(
            self.key,
            AxisEntry {
                label: self.label,
                values: self.values,
                prompt_keyword,
            },
        );
        self.sweep_builder
    }
}
