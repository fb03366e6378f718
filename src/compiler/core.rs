use std::collections::HashSet;
use crate::compiler::expander::{cartesian_product, AxisGroup, Expander};
use crate::compiler::label::{build_label_string, sanitize_filename};
use crate::dsl::{key_base, FullKey, LabelSummary, Patch, SweepConfig, SweepValue, WorkflowGraph};
use crate::error::Result;
use serde_json::Value;
use tracing::{debug, info};

/// One surviving point of the sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub patch: Patch,
    pub summary: LabelSummary,
    /// `label=value / ...` display string.
    pub label: String,
    /// Filesystem-safe form of `label`.
    pub filename_prefix: String,
}

/// Label summaries already planned in one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeenLabels {
    keys: HashSet<Vec<(String, String)>>,
}

impl SeenLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the summary; `false` if an equal one was already recorded.
    pub fn insert(&mut self, summary: &LabelSummary) -> bool {
        self.keys.insert(dedup_key(summary))
    }

    pub fn contains(&self, summary: &LabelSummary) -> bool {
        self.keys.contains(&dedup_key(summary))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Order-independent identity of a summary: sorted (label, rendered value)
/// pairs. Values compare by their label text, so `1` and `"1"` are the same
/// point while `1` and `1.0` are not.
pub fn dedup_key(summary: &LabelSummary) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = summary
        .iter()
        .map(|(label, value)| (label.clone(), value.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Debug, Clone)]
pub struct Plan {
    pub combinations: Vec<Combination>,
    /// Combinations dropped because their label summary was already seen.
    pub duplicates: usize,
    pub seen: SeenLabels,
}

/// Partitioned sweep config: labeled groups in order of first appearance,
/// unlabeled axes in config order.
#[derive(Debug, Clone, Default)]
pub struct ConfigGroups {
    pub labeled: Vec<(String, AxisGroup)>,
    pub unlabeled: AxisGroup,
}

pub fn extract_config_groups(config: &SweepConfig) -> ConfigGroups {
    let mut groups = ConfigGroups::default();
    for (key, entry) in config.iter() {
        let axis = (key.clone(), entry.values.clone());
        match entry.label() {
            Some(label) => match groups.labeled.iter_mut().find(|(l, _)| l == label) {
                Some((_, group)) => group.push(axis),
                None => groups.labeled.push((label.to_string(), vec![axis])),
            },
            None => groups.unlabeled.push(axis),
        }
    }
    groups
}

/// Expands a sweep config against a base graph into the ordered list of
/// distinct combinations.
pub struct Planner<'a> {
    workflow: &'a WorkflowGraph,
    config: &'a SweepConfig,
}

impl<'a> Planner<'a> {
    pub fn new(workflow: &'a WorkflowGraph, config: &'a SweepConfig) -> Self {
        Self { workflow, config }
    }

    pub fn plan(&self) -> Result<Plan> {
        self.plan_with(SeenLabels::new())
    }

    /// Plans against an existing seen-set and hands it back, extended.
    ///
    /// Two combinations whose label summaries coincide are treated as the
    /// same point even when their patches differ: only the first survives.
    pub fn plan_with(&self, mut seen: SeenLabels) -> Result<Plan> {
        // 1. Partition
        let groups = extract_config_groups(self.config);
        info!(
            "Sweep has {} label group(s) and {} unlabeled axis/axes",
            groups.labeled.len(),
            groups.unlabeled.len()
        );

        // 2. Expand each labeled group on its own
        let expander = Expander::new(self.workflow);
        let mut expanded: Vec<(&str, Vec<Patch>)> = Vec::with_capacity(groups.labeled.len());
        for (label, group) in &groups.labeled {
            expanded.push((label.as_str(), expander.expand(group)?));
        }

        let unlabeled_keys = groups
            .unlabeled
            .iter()
            .map(|(key, _)| FullKey::parse(key).map(|full| (key.as_str(), full)))
            .collect::<Result<Vec<_>>>()?;

        // 3. Two independent cross products, combined pairwise
        let labeled_lists: Vec<&[Patch]> = expanded.iter().map(|(_, p)| p.as_slice()).collect();
        let unlabeled_lists: Vec<&[SweepValue]> = groups.unlabeled.iter().map(|(_, v)| v.as_slice()).collect();
        let labeled_combos = cartesian_product(&labeled_lists);
        let unlabeled_combos = cartesian_product(&unlabeled_lists);

        let mut combinations = Vec::new();
        let mut duplicates = 0;

        for labeled in &labeled_combos {
            // 4. Merge labeled patches and summarize them
            let mut merged_labeled = Patch::new();
            let mut labeled_summary = LabelSummary::new();
            for ((label, _), patch) in expanded.iter().zip(labeled.iter()) {
                if patch.is_empty() {
                    labeled_summary.insert(label.to_string(), SweepValue::Off);
                    continue;
                }
                merged_labeled.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
                if let Some(value) = summarize_patch(patch) {
                    labeled_summary.insert(label.to_string(), value);
                }
            }

            for unlabeled in &unlabeled_combos {
                // 5. Layer the unlabeled choices on top
                let mut merged = merged_labeled.clone();
                let mut summary = labeled_summary.clone();
                for ((raw, key), value) in unlabeled_keys.iter().zip(unlabeled.iter()) {
                    merged.insert(key.clone(), (*value).clone());
                    summary.insert(self.config.display_label(raw).to_string(), (*value).clone());
                }

                // 6. Width/height reconciliation
                self.reconcile_resolution(&merged, &mut summary);

                // 7. Dedup
                if !seen.insert(&summary) {
                    debug!("Dropping duplicate combination: {:?}", dedup_key(&summary));
                    duplicates += 1;
                    continue;
                }

                let label = build_label_string(&summary, self.config);
                let filename_prefix = sanitize_filename(&label);
                combinations.push(Combination {
                    patch: merged,
                    summary,
                    label,
                    filename_prefix,
                });
            }
        }

        info!(
            "Planned {} combination(s), {} duplicate(s) dropped",
            combinations.len(),
            duplicates
        );

        Ok(Plan {
            combinations,
            duplicates,
            seen,
        })
    }

    /// A patch carrying both `<base>/width` and `<base>/height` shows up in
    /// the summary of the labeled `<base>/resolution` axis as `WxH`.
    fn reconcile_resolution(&self, merged: &Patch, summary: &mut LabelSummary) {
        for (key, _) in merged.iter() {
            let raw = key.to_string();
            if !raw.ends_with("/width") && !raw.ends_with("/height") {
                continue;
            }
            let Some(base) = key_base(&raw) else {
                continue;
            };
            let width = lookup(merged, &format!("{}/width", base));
            let height = lookup(merged, &format!("{}/height", base));
            let (Some(width), Some(height)) = (width, height) else {
                continue;
            };
            if !is_truthy(width) || !is_truthy(height) {
                continue;
            }
            let resolution_key = format!("{}/resolution", base);
            if let Some(label) = self.config.get(&resolution_key).and_then(|e| e.label()) {
                let rendered = format!("{}x{}", width, height);
                summary.insert(label.to_string(), SweepValue::Scalar(Value::String(rendered)));
            }
        }
    }
}

fn lookup<'p>(patch: &'p Patch, raw: &str) -> Option<&'p SweepValue> {
    FullKey::parse(raw).ok().and_then(|key| patch.get(&key))
}

/// What a labeled group's patch shows in the summary: the last entry wins,
/// strength records show their strength.
fn summarize_patch(patch: &Patch) -> Option<SweepValue> {
    patch.iter().last().map(|(_, value)| match value {
        SweepValue::Strength { strength, .. } => SweepValue::Scalar(strength.clone()),
        other => other.clone(),
    })
}

fn is_truthy(value: &SweepValue) -> bool {
    match value {
        SweepValue::Off | SweepValue::Resolution { .. } | SweepValue::Strength { .. } => true,
        SweepValue::Scalar(v) => match v {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        },
    }
}
