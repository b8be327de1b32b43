//! JSON report of a scenario run.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// The step that stopped a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    /// Zero-based index into the scenario's steps
    pub step: usize,
    /// Kind of step that failed, e.g. `assert_snap` or `snap_to`
    pub assertion: String,
    pub message: String,
}

/// Outcome of a run plus the sheet's final observable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetReport {
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    /// Display form of the final state, e.g. `at_rest(auto)`
    pub final_state: String,
    pub final_offset: f32,
    /// Host notifications in delivery order
    pub events: Vec<String>,
}

impl SheetReport {
    /// A run that completed, or stopped at `failure`
    pub fn new(failure: Option<StepFailure>, elapsed_frames: u64, elapsed_ms: u64) -> Self {
        let status = match failure {
            Some(_) => ReportStatus::Failed,
            None => ReportStatus::Passed,
        };
        Self {
            status,
            failure,
            elapsed_frames,
            elapsed_ms,
            final_state: String::new(),
            final_offset: 0.0,
            events: Vec::new(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    /// Attach the final sheet state and notification log
    pub fn with_final(mut self, state: String, offset: f32, events: Vec<String>) -> Self {
        self.final_state = state;
        self.final_offset = offset;
        self.events = events;
        self
    }

    /// Pretty JSON followed by a newline
    pub fn write(&self, mut writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write to a path relative to the working directory, creating parents
    pub fn save(&self, path: &Path) -> Result<()> {
        let relative = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !relative {
            bail!(
                "report path {} must be relative and stay below the working directory",
                path.display()
            );
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        self.write(BufWriter::new(file))
    }
}
