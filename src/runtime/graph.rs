use serde_json::{Map, Value};
use crate::dsl::{FullKey, Patch, WorkflowGraph};

/// Class tag of the text-encode nodes that receive prompt keywords.
pub const PROMPT_NODE_CLASS: &str = "CLIPTextEncode";

impl WorkflowGraph {
    /// Current value of `<title>/<input>`, or an empty record when the key is
    /// malformed, no node carries the title, or the node lacks the input.
    ///
    /// With duplicate titles the first node in node-id order wins.
    pub fn extract_existing_inputs(&self, full_key: &str) -> Value {
        let Ok(key) = FullKey::parse(full_key) else {
            return Value::Object(Map::new());
        };
        self.nodes
            .values()
            .find(|node| node.title() == Some(key.title()))
            .and_then(|node| node.inputs.get(key.input()).cloned())
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Writes every patch entry into each node whose title matches.
    /// Entries matching no node are dropped.
    pub fn apply_patch(&mut self, patch: &Patch) {
        for node in self.nodes.values_mut() {
            let Some(title) = node.title().map(str::to_string) else {
                continue;
            };
            for (key, value) in patch.iter() {
                if key.title() == title {
                    node.inputs.insert(key.input().to_string(), value.to_json());
                }
            }
        }
    }

    /// Points every `filename_prefix` input at `prefix` and turns on
    /// every `save_metadata` input.
    pub fn set_output_prefix(&mut self, prefix: &str) {
        for node in self.nodes.values_mut() {
            if let Some(slot) = node.inputs.get_mut("filename_prefix") {
                *slot = Value::String(prefix.to_string());
            }
            if let Some(slot) = node.inputs.get_mut("save_metadata") {
                *slot = Value::Bool(true);
            }
        }
    }

    /// Appends `prompt_text` on a new line to the `text` input of each
    /// prompt node titled `prompt_name`. Returns how many nodes changed.
    pub fn append_prompt_keyword(&mut self, prompt_name: &str, prompt_text: &str) -> usize {
        let mut changed = 0;
        for node in self.nodes.values_mut() {
            if node.class_type != PROMPT_NODE_CLASS || node.title() != Some(prompt_name) {
                continue;
            }
            let current = match node.inputs.get("text") {
                None => String::new(),
                Some(Value::String(s)) => s.clone(),
                // linked from another node
                Some(_) => continue,
            };
            if current.contains(prompt_text) {
                continue;
            }
            let text = format!("{}\n{}", current.trim_end(), prompt_text);
            node.inputs.insert("text".to_string(), Value::String(text));
            changed += 1;
        }
        changed
    }

    /// Compact JSON form, as embedded in the submission metadata.
    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
