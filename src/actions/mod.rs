use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt::Debug;
use crate::dsl::WorkflowGraph;
use crate::error::Result;

pub mod builtin;
pub mod http;

/// Where prepared graphs go: the remote service, or nowhere in a dry run.
#[async_trait]
pub trait Submitter: Send + Sync + Debug {
    fn name(&self) -> &str;
    /// Queues one graph; returns the service's response body.
    async fn submit(&self, prompt: &WorkflowGraph) -> Result<Value>;
}

/// `{prompt, extra_pnginfo: {workflow}}` body understood by the service.
pub fn build_payload(prompt: &WorkflowGraph) -> Result<Value> {
    let workflow = prompt.to_compact_json()?;
    Ok(json!({
        "prompt": prompt,
        "extra_pnginfo": {
            "workflow": workflow
        }
    }))
}
