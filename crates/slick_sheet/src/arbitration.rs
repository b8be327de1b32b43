//! Drag vs. scroll arbitration
//!
//! When the sheet's most open snap still cannot show all of its content
//! ([`SnapTable::is_scroll`]), a pointer gesture may belong either to the
//! sheet (drag) or to the inner scroll view. The [`Arbiter`] makes that call
//! per pointer event from the live [`ArbitrationMode`]:
//!
//! - not fully open: the sheet owns every gesture and content scroll stays off
//! - fully open, moving down while the content is scrolled to its top: the
//!   sheet takes the gesture over, even mid-gesture
//! - fully open otherwise: the content scrolls, and keeps the gesture until
//!   the pointer is released

use serde::{Deserialize, Serialize};

use crate::snap::SnapTable;

/// Proximity of the live offset to the min/max snaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrationMode {
    /// Near the least open snap
    Min,
    /// Near the most open snap
    Max,
    #[default]
    Neutral,
}

impl ArbitrationMode {
    /// Classify `offset` against the table; `Max` wins when both bands overlap
    pub fn classify(offset: f32, table: &SnapTable, tolerance: f32) -> Self {
        if (offset - table.max_snap().value).abs() <= tolerance {
            ArbitrationMode::Max
        } else if (offset - table.min_snap().value).abs() <= tolerance {
            ArbitrationMode::Min
        } else {
            ArbitrationMode::Neutral
        }
    }
}

/// What a pointer event means for gesture ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The sheet should start owning the gesture
    StartDrag,
    /// Content scroll was switched on or off
    ContentScroll(bool),
    /// Nothing changes
    Ignore,
}

/// Per-pointer-session arbitration state
#[derive(Debug, Clone, Default)]
pub struct Arbiter {
    mode: ArbitrationMode,
    pointer_active: bool,
    last_pointer_y: Option<f32>,
    scroll_passthrough: bool,
    content_scroll: bool,
}

impl Arbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ArbitrationMode {
        self.mode
    }

    pub fn pointer_active(&self) -> bool {
        self.pointer_active
    }

    pub fn last_pointer_y(&self) -> Option<f32> {
        self.last_pointer_y
    }

    /// Whether the content scroll owns the current pointer session
    pub fn scroll_passthrough(&self) -> bool {
        self.scroll_passthrough
    }

    /// Whether inner content may currently consume scroll input
    pub fn content_scroll_enabled(&self) -> bool {
        self.content_scroll
    }

    /// Update the mode from a live offset sample
    pub fn update_mode(&mut self, offset: f32, table: &SnapTable, tolerance: f32) {
        let mode = ArbitrationMode::classify(offset, table, tolerance);
        if mode != self.mode {
            tracing::trace!("Arbitration mode {:?} -> {:?} at {:.1}", self.mode, mode, offset);
            self.mode = mode;
        }
    }

    /// Pointer pressed at `y`.
    ///
    /// Returns `StartDrag` unless the sheet is scrollable and fully open, in
    /// which case ownership is decided by the following moves.
    pub fn pointer_down(&mut self, y: f32, scrollable: bool) -> Decision {
        self.pointer_active = true;
        self.scroll_passthrough = false;
        self.content_scroll = false;
        self.last_pointer_y = Some(y);

        if !scrollable || self.mode != ArbitrationMode::Max {
            return Decision::StartDrag;
        }

        tracing::trace!("Pointer down at {y:.1} while fully open, deferring ownership");
        Decision::Ignore
    }

    /// Pointer moved to `y`.
    ///
    /// `dragging` is whether a drag session is already active and
    /// `scroll_at_top` whether the inner content is scrolled to its top.
    pub fn pointer_move(
        &mut self,
        y: f32,
        scrollable: bool,
        dragging: bool,
        scroll_at_top: bool,
    ) -> Decision {
        if !scrollable || !self.pointer_active {
            return Decision::Ignore;
        }
        let Some(last_y) = self.last_pointer_y else {
            return Decision::Ignore;
        };

        let decision = if self.mode == ArbitrationMode::Max {
            let moving_down = last_y <= y;
            if moving_down && scroll_at_top && !self.scroll_passthrough {
                if dragging {
                    Decision::Ignore
                } else {
                    tracing::trace!("Pull-down at scroll top, sheet takes the gesture");
                    Decision::StartDrag
                }
            } else {
                self.scroll_passthrough = true;
                self.set_content_scroll(true)
            }
        } else {
            self.set_content_scroll(false)
        };

        if !dragging && decision != Decision::StartDrag {
            self.last_pointer_y = Some(y);
        }

        decision
    }

    /// Pointer released; ends the pointer session
    pub fn pointer_up(&mut self) {
        self.pointer_active = false;
        self.scroll_passthrough = false;
        self.last_pointer_y = None;
    }

    fn set_content_scroll(&mut self, enabled: bool) -> Decision {
        if self.content_scroll == enabled {
            return Decision::Ignore;
        }
        self.content_scroll = enabled;
        Decision::ContentScroll(enabled)
    }
}
