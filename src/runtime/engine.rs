use std::sync::Arc;
use crate::actions::Submitter;
use crate::actions::builtin::DryRunSubmitter;
use crate::actions::http::HttpSubmitter;
use crate::compiler::core::{Combination, Plan, Planner};
use crate::dsl::{SweepConfig, WorkflowGraph};
use crate::error::Result;
use crate::runtime::config::RunConfig;
use crate::runtime::storage::{DirectoryOutputStore, OutputStore};
use tracing::{debug, error, info, warn};

/// Tally of one sweep run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub planned: usize,
    pub queued: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duplicates: usize,
}

/// Drives planned combinations to the remote service, one at a time.
pub struct Engine {
    submitter: Arc<dyn Submitter>,
    outputs: Arc<dyn OutputStore>,
}

impl Engine {
    pub fn new(submitter: Arc<dyn Submitter>, outputs: Arc<dyn OutputStore>) -> Self {
        Self { submitter, outputs }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        let submitter: Arc<dyn Submitter> = if config.dry_run {
            Arc::new(DryRunSubmitter)
        } else {
            Arc::new(HttpSubmitter::new(config.api_url.clone()))
        };
        let outputs = Arc::new(DirectoryOutputStore::new(config.output_dir.clone()));
        Self::new(submitter, outputs)
    }

    /// Fresh copy of `workflow` with the combination applied: patch, output
    /// prefix, and prompt keywords of active strength axes.
    pub fn prepare_prompt(workflow: &WorkflowGraph, config: &SweepConfig, combination: &Combination) -> WorkflowGraph {
        let mut prompt = workflow.clone();
        prompt.apply_patch(&combination.patch);
        prompt.set_output_prefix(&combination.filename_prefix);

        for (key, entry) in config.iter() {
            if !key.contains("/strength") {
                continue;
            }
            let Some(keywords) = &entry.prompt_keyword else {
                continue;
            };
            let label = config.display_label(key);
            if combination.summary.get(label).is_some_and(|v| v.is_off()) {
                continue;
            }
            for kw in keywords.iter() {
                prompt.append_prompt_keyword(&kw.prompt_name, &kw.prompt_text);
            }
        }

        prompt
    }

    /// Plans and runs the whole sweep. Planning errors are fatal;
    /// submission errors are logged and counted.
    pub async fn run_sweep(&self, workflow: &WorkflowGraph, config: &SweepConfig) -> Result<RunReport> {
        let plan = Planner::new(workflow, config).plan()?;
        Ok(self.run(workflow, config, &plan).await)
    }

    pub async fn run(&self, workflow: &WorkflowGraph, config: &SweepConfig, plan: &Plan) -> RunReport {
        let mut report = RunReport {
            planned: plan.combinations.len(),
            duplicates: plan.duplicates,
            ..RunReport::default()
        };

        for combination in &plan.combinations {
            let prompt = Self::prepare_prompt(workflow, config, combination);

            match self.outputs.exists(&combination.filename_prefix) {
                Ok(true) => {
                    info!("Skipping (already exists): {}", combination.filename_prefix);
                    report.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => warn!("Cannot check outputs for {}, submitting anyway: {}", combination.filename_prefix, e),
            }

            info!("Queued {}", combination.label);
            match self.submitter.submit(&prompt).await {
                Ok(response) => {
                    if let Some(id) = response.get("prompt_id").and_then(|v| v.as_str()) {
                        debug!(prompt_id = id, submitter = self.submitter.name(), "Submission accepted");
                    }
                    report.queued += 1;
                }
                Err(e) => {
                    error!("Error submitting prompt: {}", e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Sweep finished: {} planned, {} queued, {} skipped, {} failed, {} duplicate(s) dropped",
            report.planned, report.queued, report.skipped, report.failed, report.duplicates
        );
        report
    }
}
