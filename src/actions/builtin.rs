use async_trait::async_trait;
use serde_json::{json, Value};
use crate::actions::{build_payload, Submitter};
use crate::dsl::WorkflowGraph;
use crate::error::Result;
use tracing::info;

/// Builds the payload but sends it nowhere.
#[derive(Debug, Default)]
pub struct DryRunSubmitter;

#[async_trait]
impl Submitter for DryRunSubmitter {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn submit(&self, prompt: &WorkflowGraph) -> Result<Value> {
        let payload = build_payload(prompt)?;
        let size = payload.to_string().len();
        info!("[DRY RUN] would submit {} node(s), {} bytes", prompt.nodes.len(), size);
        Ok(json!({ "dry_run": true }))
    }
}
