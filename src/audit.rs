//! Resolution audit log
//!
//! One JSON line per resolved utterance, written by the session layer.

use crate::config::config_dir;
use crate::error::VoiceResult;
use crate::processor::ResolutionTrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSON lines sink for resolution traces
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `resolutions.log` next to the config file
    pub fn open_default() -> Self {
        Self::new(config_dir().join("resolutions.log"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a trace with a local timestamp
    pub fn record(&self, trace: &ResolutionTrace) -> VoiceResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let entry = serde_json::json!({
            "timestamp": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "trace": trace,
        });
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}
