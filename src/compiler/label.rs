use std::collections::HashSet;
use crate::dsl::{LabelSummary, SweepConfig};

/// Joins `label=value` parts with `" / "`: config order first, then any
/// summary entries the config did not name, in summary order.
pub fn build_label_string(summary: &LabelSummary, config: &SweepConfig) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut parts = Vec::with_capacity(summary.len());

    for (key, _) in config.iter() {
        let label = config.display_label(key);
        if seen.contains(label) {
            continue;
        }
        if let Some(value) = summary.get(label) {
            parts.push(format!("{}={}", label, value));
            seen.insert(label);
        }
    }

    for (label, value) in summary.iter() {
        if !seen.contains(label.as_str()) {
            parts.push(format!("{}={}", label, value));
        }
    }

    parts.join(" / ")
}

/// `steps=30 / sampler=ddim` -> `steps-30__sampler-ddim`.
pub fn sanitize_filename(label: &str) -> String {
    // " / " has to go before the bare "/".
    label.replace(" / ", "__").replace('/', "_").replace('=', "-")
}
