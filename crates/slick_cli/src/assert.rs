//! Assertion helpers for headless sheet scenarios.

use slick_sheet::{BottomSheet, SheetState, SnapKey, SnapPoint};

/// Observable sheet state used for assertions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSnapshot {
    pub state: SheetState,
    pub snap: Option<SnapPoint>,
    pub offset: f32,
}

impl SheetSnapshot {
    pub fn capture(sheet: &BottomSheet) -> Self {
        Self {
            state: sheet.state(),
            snap: sheet.current_snap(),
            offset: sheet.offset(),
        }
    }
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

pub fn evaluate_assert_state(expected: &str, snapshot: &SheetSnapshot) -> AssertionResult {
    let actual = snapshot.state.to_string();
    if actual == expected.trim() {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "state_mismatch".to_string(),
            message: format!("expected state '{expected}', got '{actual}'"),
        }
    }
}

pub fn evaluate_assert_snap(expected: SnapKey, snapshot: &SheetSnapshot) -> AssertionResult {
    let Some(snap) = snapshot.snap else {
        return AssertionResult::Failed {
            code: "missing_snap".to_string(),
            message: format!("expected snap '{expected}', but no snap is resolved"),
        };
    };
    if snap.index == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "snap_mismatch".to_string(),
            message: format!("expected snap '{expected}', got '{}'", snap.index),
        }
    }
}

pub fn evaluate_assert_offset(
    expected: f32,
    tolerance: f32,
    snapshot: &SheetSnapshot,
) -> AssertionResult {
    if (snapshot.offset - expected).abs() <= tolerance.abs() {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "offset_mismatch".to_string(),
            message: format!(
                "expected offset {expected:.1} (±{tolerance}), got {:.1}",
                snapshot.offset
            ),
        }
    }
}
