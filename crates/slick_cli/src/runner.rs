//! Scenario runner that replays steps against a headless sheet.

use crate::assert::{
    evaluate_assert_offset, evaluate_assert_snap, evaluate_assert_state, AssertionResult,
    SheetSnapshot,
};
use crate::config::SheetFile;
use crate::report::{SheetReport, StepFailure};
use crate::scenario::{Scenario, ScenarioStep};
use anyhow::{bail, Result};
use slick_sheet::{BottomSheet, SheetCallbacks, SnapOptions};
use std::sync::{Arc, Mutex};

/// Configuration for deterministic headless runs.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Logical milliseconds between frames.
    pub tick_ms: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { tick_ms: 16.0 }
    }
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: SheetReport },
    Failed { report: SheetReport },
}

impl RunOutcome {
    pub fn report(&self) -> &SheetReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Frame clock shared by all steps of a run
#[derive(Debug, Default)]
struct Clock {
    frames: u64,
    elapsed_ms: f64,
}

impl Clock {
    fn tick(&mut self, sheet: &mut BottomSheet, tick_ms: f32) {
        sheet.tick(tick_ms);
        self.frames = self.frames.saturating_add(1);
        self.elapsed_ms += f64::from(tick_ms);
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.round() as u64
    }
}

type EventLog = Arc<Mutex<Vec<String>>>;

fn recording_callbacks(log: &EventLog) -> SheetCallbacks {
    let (open, close_start, close_end, snap) = (log.clone(), log.clone(), log.clone(), log.clone());
    SheetCallbacks::new()
        .on_open_start(move || push(&open, "open_start".to_string()))
        .on_close_start(move || push(&close_start, "close_start".to_string()))
        .on_close_end(move || push(&close_end, "close_end".to_string()))
        .on_snap(move |point| push(&snap, format!("snap:{}", point.index)))
}

fn push(log: &EventLog, event: String) {
    if let Ok(mut events) = log.lock() {
        events.push(event);
    }
}

fn take_events(log: &EventLog) -> Vec<String> {
    log.lock().map(|events| events.clone()).unwrap_or_default()
}

/// Execute scenario JSON against a sheet file.
pub fn run_scenario(sheet_file: &SheetFile, input: &str, cfg: RunConfig) -> Result<RunOutcome> {
    let scenario = Scenario::from_json(input)?;
    run_loaded_scenario(sheet_file, &scenario, cfg)
}

/// Execute a pre-loaded scenario against a sheet file.
pub fn run_loaded_scenario(
    sheet_file: &SheetFile,
    scenario: &Scenario,
    cfg: RunConfig,
) -> Result<RunOutcome> {
    if cfg.tick_ms.is_nan() || cfg.tick_ms <= 0.0 {
        bail!("tick_ms must be > 0");
    }

    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let mut sheet =
        BottomSheet::new(sheet_file.sheet.clone()).with_callbacks(recording_callbacks(&log));
    if let Some(geometry) = sheet_file.geometry {
        sheet.set_geometry(geometry);
    }

    let mut clock = Clock::default();
    let mut failure = None;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("step {step_index}: {step:?}");

        let step_failure = match step {
            ScenarioStep::SetGeometry(geometry) => {
                sheet.set_geometry(*geometry);
                None
            }
            ScenarioStep::Open => {
                sheet.open();
                None
            }
            ScenarioStep::Close => {
                sheet.close();
                None
            }
            ScenarioStep::SnapTo {
                target,
                animate,
                nearest,
            } => {
                let options = SnapOptions {
                    animate: *animate,
                    nearest: *nearest,
                };
                sheet
                    .snap_to(*target, options)
                    .err()
                    .map(|err| ("snap_to", err.to_string()))
            }
            ScenarioStep::PointerDown { y } => {
                sheet.pointer_down(*y);
                None
            }
            ScenarioStep::PointerMove { y, scroll_at_top } => {
                sheet.pointer_move(*y, *scroll_at_top);
                None
            }
            ScenarioStep::PointerUp => {
                sheet.pointer_up();
                None
            }
            ScenarioStep::DragTo { offset } => {
                sheet.drag_to(*offset);
                None
            }
            ScenarioStep::DragEnd => {
                sheet.drag_end();
                None
            }
            ScenarioStep::BackdropTap => {
                sheet.backdrop_tap();
                None
            }
            ScenarioStep::Escape => {
                sheet.escape();
                None
            }
            ScenarioStep::Tick { frames } => {
                for _ in 0..*frames {
                    clock.tick(&mut sheet, cfg.tick_ms);
                }
                None
            }
            ScenarioStep::Settle { max_frames } => {
                let mut remaining = *max_frames;
                while sheet.is_animating() && remaining > 0 {
                    clock.tick(&mut sheet, cfg.tick_ms);
                    remaining -= 1;
                }
                // One resting frame so velocity reads zero
                clock.tick(&mut sheet, cfg.tick_ms);
                if sheet.is_animating() {
                    Some((
                        "settle",
                        format!("sheet still animating after {max_frames} frames"),
                    ))
                } else {
                    None
                }
            }
            ScenarioStep::AssertState { state } => failed(
                "assert_state",
                evaluate_assert_state(state, &SheetSnapshot::capture(&sheet)),
            ),
            ScenarioStep::AssertSnap { snap } => failed(
                "assert_snap",
                evaluate_assert_snap(*snap, &SheetSnapshot::capture(&sheet)),
            ),
            ScenarioStep::AssertOffset { value, tolerance } => failed(
                "assert_offset",
                evaluate_assert_offset(*value, *tolerance, &SheetSnapshot::capture(&sheet)),
            ),
        };

        if let Some((assertion, message)) = step_failure {
            tracing::warn!("step {step_index} failed: {message}");
            failure = Some(StepFailure {
                step: step_index,
                assertion: assertion.to_string(),
                message,
            });
            break;
        }
    }

    let report = SheetReport::new(failure, clock.frames, clock.elapsed_ms()).with_final(
        sheet.state().to_string(),
        sheet.offset(),
        take_events(&log),
    );
    if report.is_passed() {
        Ok(RunOutcome::Passed { report })
    } else {
        Ok(RunOutcome::Failed { report })
    }
}

fn failed(assertion: &'static str, result: AssertionResult) -> Option<(&'static str, String)> {
    match result {
        AssertionResult::Passed => None,
        AssertionResult::Failed { message, .. } => Some((assertion, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportStatus;

    fn sheet_file() -> SheetFile {
        SheetFile::from_toml(
            r#"
            [sheet]
            snaps = [0.5]
            auto_snap_as_max = false

            [geometry]
            container_height = 600
            content_height = 500
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_open_settle_passes() {
        let outcome = run_scenario(
            &sheet_file(),
            r#"{ "steps": [
                { "type": "open" },
                { "type": "settle" },
                { "type": "assert_state", "state": "at_rest(auto)" },
                { "type": "assert_offset", "value": -500 }
            ] }"#,
            RunConfig::default(),
        )
        .unwrap();

        assert!(!outcome.is_failed(), "{:?}", outcome.report());
        let report = outcome.report();
        assert_eq!(report.status, ReportStatus::Passed);
        assert_eq!(report.events, vec!["open_start", "snap:auto"]);
        assert!(report.elapsed_frames > 0);
    }

    #[test]
    fn test_failed_assertion_reports_step() {
        let outcome = run_scenario(
            &sheet_file(),
            r#"{ "steps": [
                { "type": "open" },
                { "type": "settle" },
                { "type": "assert_snap", "snap": 0 }
            ] }"#,
            RunConfig::default(),
        )
        .unwrap();

        assert!(outcome.is_failed());
        let report = outcome.report();
        let failure = report.failure.as_ref().unwrap();
        assert_eq!(failure.step, 2);
        assert_eq!(failure.assertion, "assert_snap");
        assert_eq!(report.final_state, "at_rest(auto)");
    }

    #[test]
    fn test_invalid_snap_fails_run() {
        let outcome = run_scenario(
            &sheet_file(),
            r#"{ "steps": [
                { "type": "open" },
                { "type": "snap_to", "target": 4, "nearest": true }
            ] }"#,
            RunConfig::default(),
        )
        .unwrap();

        assert!(outcome.is_failed());
        let failure = outcome.report().failure.as_ref().unwrap();
        assert_eq!(failure.assertion, "snap_to");
    }

    #[test]
    fn test_rejects_zero_tick() {
        let result = run_scenario(
            &sheet_file(),
            r#"{ "steps": [] }"#,
            RunConfig { tick_ms: 0.0 },
        );
        assert!(result.is_err());
    }
}
