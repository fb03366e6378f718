use crate::dsl::{key_base, FullKey, Patch, SweepValue, WorkflowGraph};
use crate::error::{Result, SweepError};
use itertools::Itertools;
use serde_json::Value;

/// Axes expanded together: config key -> candidates, in config order.
pub type AxisGroup = Vec<(String, Vec<SweepValue>)>;

/// Turns one axis group into the patches for each of its own candidates.
pub struct Expander<'a> {
    workflow: &'a WorkflowGraph,
}

impl<'a> Expander<'a> {
    pub fn new(workflow: &'a WorkflowGraph) -> Self {
        Self { workflow }
    }

    pub fn expand(&self, group: &AxisGroup) -> Result<Vec<Patch>> {
        // Resolution axes always write width and height together.
        if let [(key, candidates)] = group.as_slice() {
            if key.ends_with("/resolution") {
                return self.expand_resolution(key, candidates);
            }
        }

        let Some((first_key, _)) = group.first() else {
            return Ok(Vec::new());
        };
        let base = key_base(first_key).ok_or_else(|| SweepError::InvalidKey {
            key: first_key.clone(),
            reason: "missing '/' separator",
        })?;
        let strength_key = format!("{}/strength", base);

        match group.iter().find(|(key, _)| *key == strength_key) {
            Some((_, candidates)) => self.expand_strength(base, &strength_key, candidates),
            None => self.expand_product(group),
        }
    }

    fn expand_resolution(&self, key: &str, candidates: &[SweepValue]) -> Result<Vec<Patch>> {
        let base = key_base(key).unwrap_or(key);
        let width_key = FullKey::parse(&format!("{}/width", base))?;
        let height_key = FullKey::parse(&format!("{}/height", base))?;

        candidates
            .iter()
            .map(|candidate| match candidate {
                SweepValue::Resolution { width, height } => {
                    let mut patch = Patch::new();
                    patch.insert(width_key.clone(), SweepValue::Scalar(width.clone()));
                    patch.insert(height_key.clone(), SweepValue::Scalar(height.clone()));
                    Ok(patch)
                }
                other => Err(SweepError::UnexpectedShape {
                    key: key.to_string(),
                    reason: format!("expected {{width, height}}, got {}", other.to_json()),
                }),
            })
            .collect()
    }

    /// `"off"` contributes nothing; any other candidate switches the target
    /// record on with that strength, keeping its current `lora`.
    fn expand_strength(&self, base: &str, strength_key: &str, candidates: &[SweepValue]) -> Result<Vec<Patch>> {
        // `<title>/<input>/strength` drives the `<input>` record. A bare
        // `<title>/strength` drives the node's own `strength` input and reads
        // `lora` from its sibling input.
        let (target, lora) = if base.contains('/') {
            let record = match self.workflow.extract_existing_inputs(base) {
                Value::Object(record) => record,
                other => {
                    return Err(SweepError::UnexpectedShape {
                        key: strength_key.to_string(),
                        reason: format!("input '{}' is not a record, found {}", base, other),
                    });
                }
            };
            (FullKey::parse(base)?, record.get("lora").cloned())
        } else {
            let existing = self.workflow.extract_existing_inputs(&format!("{}/lora", base));
            let lora = match existing {
                Value::Object(ref obj) if obj.is_empty() => None,
                other => Some(other),
            };
            (FullKey::parse(strength_key)?, lora)
        };

        candidates
            .iter()
            .map(|candidate| match candidate {
                SweepValue::Off => Ok(Patch::new()),
                SweepValue::Scalar(strength) => {
                    let mut patch = Patch::new();
                    patch.insert(
                        target.clone(),
                        SweepValue::Strength {
                            on: true,
                            strength: strength.clone(),
                            lora: lora.clone(),
                        },
                    );
                    Ok(patch)
                }
                other => Err(SweepError::UnexpectedShape {
                    key: strength_key.to_string(),
                    reason: format!("expected \"off\" or a strength, got {}", other.to_json()),
                }),
            })
            .collect()
    }

    fn expand_product(&self, group: &AxisGroup) -> Result<Vec<Patch>> {
        let keys = group
            .iter()
            .map(|(key, _)| FullKey::parse(key))
            .collect::<Result<Vec<_>>>()?;
        let lists: Vec<&[SweepValue]> = group.iter().map(|(_, values)| values.as_slice()).collect();

        Ok(cartesian_product(&lists)
            .into_iter()
            .map(|combo| keys.iter().cloned().zip(combo.into_iter().cloned()).collect::<Patch>())
            .collect())
    }
}

/// Every way of picking one item per list, leftmost list varying slowest.
/// No lists yield one empty pick; any empty list yields none.
pub fn cartesian_product<'v, T>(lists: &[&'v [T]]) -> Vec<Vec<&'v T>> {
    if lists.is_empty() {
        return vec![Vec::new()];
    }
    lists
        .iter()
        .map(|&list| list.iter())
        .multi_cartesian_product()
        .collect()
}
