//! Scenario definition for headless sheet runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use slick_sheet::{SheetGeometry, SnapKey, SnapTarget};
use std::path::Path;

/// Sequence of steps replayed against a headless sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid scenario {}", path.display()))
    }
}

/// One scenario step: a host input or an assertion.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    SetGeometry(SheetGeometry),
    Open,
    Close,
    SnapTo {
        target: SnapTarget,
        #[serde(default = "default_true")]
        animate: bool,
        #[serde(default)]
        nearest: bool,
    },
    PointerDown {
        y: f32,
    },
    PointerMove {
        y: f32,
        #[serde(default = "default_true")]
        scroll_at_top: bool,
    },
    PointerUp,
    DragTo {
        offset: f32,
    },
    DragEnd,
    BackdropTap,
    Escape,
    Tick {
        frames: u32,
    },
    /// Tick until the sheet stops animating
    Settle {
        #[serde(default = "default_settle_frames")]
        max_frames: u32,
    },
    /// Compare against the state's display form, e.g. `at_rest(auto)`
    AssertState {
        state: String,
    },
    AssertSnap {
        snap: SnapKey,
    },
    AssertOffset {
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
}

fn default_true() -> bool {
    true
}

fn default_settle_frames() -> u32 {
    600
}

fn default_tolerance() -> f32 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_json(
            r#"{ "steps": [
                { "type": "set_geometry", "container_height": 600, "content_height": 300 },
                { "type": "open" },
                { "type": "settle" },
                { "type": "snap_to", "target": "default", "nearest": true },
                { "type": "snap_to", "target": 1, "animate": false },
                { "type": "pointer_move", "y": 12.5 },
                { "type": "assert_snap", "snap": "close" },
                { "type": "assert_offset", "value": -300 }
            ] }"#,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 8);
        match &scenario.steps[0] {
            ScenarioStep::SetGeometry(geometry) => {
                assert_eq!(geometry.content_height, Some(300.0));
                assert_eq!(geometry.header_height, 0.0);
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::Settle { max_frames: 600 }
        ));
        assert!(matches!(
            scenario.steps[3],
            ScenarioStep::SnapTo {
                target: SnapTarget::Default,
                animate: true,
                nearest: true
            }
        ));
        assert!(matches!(
            scenario.steps[4],
            ScenarioStep::SnapTo {
                target: SnapTarget::Key(SnapKey::Index(1)),
                animate: false,
                ..
            }
        ));
        assert!(matches!(
            scenario.steps[5],
            ScenarioStep::PointerMove {
                scroll_at_top: true,
                ..
            }
        ));
        assert!(matches!(
            scenario.steps[6],
            ScenarioStep::AssertSnap {
                snap: SnapKey::Close
            }
        ));
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        assert!(Scenario::from_json(r#"{ "steps": [{ "type": "fling" }] }"#).is_err());
    }
}
