use indexmap::IndexMap;
use super::{FullKey, SweepValue};

/// Partial graph update: full key -> value, in insertion order.
///
/// Re-inserting a key keeps its position and takes the new value.
pub type Patch = IndexMap<FullKey, SweepValue>;

/// Per-combination record of label -> chosen value.
///
/// Drives both the display string and duplicate detection.
pub type LabelSummary = IndexMap<String, SweepValue>;
