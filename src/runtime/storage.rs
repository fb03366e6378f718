use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use globset::{Glob, GlobMatcher};
use crate::error::{Result, SweepError};

/// Extensions of finished outputs.
pub const OUTPUT_EXTENSIONS: [&str; 2] = ["png", "mp4"];

// --- Interface ---

pub trait OutputStore: Send + Sync + Debug {
    /// Whether a finished output for this filename prefix already exists.
    fn exists(&self, prefix: &str) -> Result<bool>;
}

/// `<prefix>*.{png,mp4}` with the prefix taken literally; the service
/// appends a counter to the prefix when it writes a file.
pub fn output_matcher(prefix: &str) -> Result<GlobMatcher> {
    let pattern = format!(
        "{}*.{{{}}}",
        globset::escape(prefix),
        OUTPUT_EXTENSIONS.join(",")
    );
    let glob = Glob::new(&pattern).map_err(|e| SweepError::InvalidGlobPattern(pattern.clone(), e))?;
    Ok(glob.compile_matcher())
}

// --- Filesystem Implementation ---

/// Matches file names directly inside the output directory.
#[derive(Debug, Clone)]
pub struct DirectoryOutputStore {
    dir: PathBuf,
}

impl DirectoryOutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputStore for DirectoryOutputStore {
    fn exists(&self, prefix: &str) -> Result<bool> {
        let matcher = output_matcher(prefix)?;
        // A missing directory just means nothing was rendered yet
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Ok(false);
        };
        Ok(entries
            .flatten()
            .any(|entry| matcher.is_match(entry.file_name())))
    }
}
