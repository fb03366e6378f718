use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:4000/prompt";
pub const DEFAULT_OUTPUT_DIR: &str = "/workspace/ComfyUI/output";

/// Settings for one sweep run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Endpoint receiving `{prompt, extra_pnginfo}` bodies.
    pub api_url: String,
    /// Directory the remote service writes results into.
    pub output_dir: PathBuf,
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            dry_run: false,
        }
    }
}
