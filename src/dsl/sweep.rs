use std::fmt;
use std::ops::{Deref, DerefMut};
use indexmap::IndexMap;
use serde::{Serialize, Deserialize, Deserializer};
use serde_json::{json, Value};
use super::key_leaf;

/// One value an axis can take, or one value a patch writes.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepValue {
    /// The literal `"off"`. On a strength axis it means "leave the graph alone".
    Off,
    Scalar(Value),
    /// `{width, height}` record; dimensions are kept as written.
    Resolution { width: Value, height: Value },
    /// Record written to a LoRA-style input when a strength axis is active.
    Strength { on: bool, strength: Value, lora: Option<Value> },
}

impl SweepValue {
    /// Reads a candidate from raw config JSON.
    pub fn from_candidate(raw: Value) -> Self {
        match &raw {
            Value::String(s) if s == "off" => SweepValue::Off,
            Value::Object(obj) => match (obj.get("width"), obj.get("height")) {
                (Some(width), Some(height)) => SweepValue::Resolution {
                    width: width.clone(),
                    height: height.clone(),
                },
                _ => SweepValue::Scalar(raw),
            },
            _ => SweepValue::Scalar(raw),
        }
    }

    /// The JSON written into a node input.
    pub fn to_json(&self) -> Value {
        match self {
            SweepValue::Off => Value::String("off".to_string()),
            SweepValue::Scalar(v) => v.clone(),
            SweepValue::Resolution { width, height } => json!({ "width": width, "height": height }),
            SweepValue::Strength { on, strength, lora } => json!({
                "on": on,
                "strength": strength,
                "lora": lora,
            }),
        }
    }

    pub fn is_off(&self) -> bool {
        matches!(self, SweepValue::Off)
    }
}

/// Renders the value the way it appears in labels and filenames.
impl fmt::Display for SweepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepValue::Off => f.write_str("off"),
            SweepValue::Scalar(v) => write_scalar(f, v),
            SweepValue::Resolution { width, height } => {
                write_scalar(f, width)?;
                f.write_str("x")?;
                write_scalar(f, height)
            }
            SweepValue::Strength { strength, .. } => write_scalar(f, strength),
        }
    }
}

fn write_scalar(f: &mut fmt::Formatter<'_>, v: &Value) -> fmt::Result {
    match v {
        Value::String(s) => f.write_str(s),
        other => write!(f, "{}", other),
    }
}

impl<'de> Deserialize<'de> for SweepValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SweepValue::from_candidate)
    }
}

impl Serialize for SweepValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Text appended to a prompt node while a strength axis is active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptKeyword {
    pub prompt_name: String,
    pub prompt_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PromptKeywords {
    One(PromptKeyword),
    Many(Vec<PromptKeyword>),
}

impl PromptKeywords {
    pub fn iter(&self) -> impl Iterator<Item = &PromptKeyword> {
        let slice = match self {
            PromptKeywords::One(kw) => std::slice::from_ref(kw),
            PromptKeywords::Many(list) => list.as_slice(),
        };
        slice.iter()
    }
}

/// One sweep axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub values: Vec<SweepValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_keyword: Option<PromptKeywords>,
}

impl AxisEntry {
    /// Explicit label; an empty string counts as no label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.is_empty())
    }
}

/// Sweep configuration: axis key -> entry, in document order.
///
/// A key repeated in the document keeps its first position and its last entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SweepConfig {
    pub axes: IndexMap<String, AxisEntry>,
}

impl SweepConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display label of an axis: its explicit label, else the key's last segment.
    pub fn display_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.axes
            .get(key)
            .and_then(AxisEntry::label)
            .unwrap_or_else(|| key_leaf(key))
    }
}

impl Deref for SweepConfig {
    type Target = IndexMap<String, AxisEntry>;

    fn deref(&self) -> &Self::Target {
        &self.axes
    }
}

impl DerefMut for SweepConfig {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.axes
    }
}
