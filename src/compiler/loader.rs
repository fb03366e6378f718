use anyhow::{Result, Context as AnyhowContext};
use std::fs;
use std::path::Path;
use crate::dsl::{SweepConfig, WorkflowGraph};

pub fn load_workflow(file_path: &Path) -> Result<WorkflowGraph> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read workflow file from {}", file_path.display()))?;

    let workflow: WorkflowGraph = serde_json::from_str(&content)
        .with_context(|| format!("Failed to deserialize workflow JSON from {}", file_path.display()))?;

    Ok(workflow)
}

/// JSON by default; YAML when the extension is `.yaml` or `.yml`.
pub fn load_sweep_config(file_path: &Path) -> Result<SweepConfig> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read sweep config from {}", file_path.display()))?;

    let is_yaml = matches!(
        file_path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );

    let config: SweepConfig = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to deserialize YAML sweep config from {}", file_path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to deserialize JSON sweep config from {}", file_path.display()))?
    };

    Ok(config)
}
