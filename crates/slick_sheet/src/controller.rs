//! Gesture/settle controller
//!
//! An explicit state machine over a [`SnapTable`]. Every input (commands,
//! pointer events, velocity samples, animation completion, geometry changes)
//! returns the [`Effects`] the host must perform, in order. The controller
//! never animates or notifies anything itself.
//!
//! ```text
//!            open()                  animation_complete()
//!  Closed ──────────────► Settling(t) ──────────────────► AtRest(t)
//!    ▲                      │   ▲                            │
//!    │ settle to close      │   │ drag_end() / snap_to()     │ pointer down
//!    │ completes            ▼   │                            ▼
//!    └──────────────────── Dragging ◄────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::arbitration::{Arbiter, ArbitrationMode, Decision};
use crate::backdrop::backdrop_opacity_with;
use crate::config::SheetConfig;
use crate::error::{ParseSnapKeyError, Result, SheetError};
use crate::geometry::SheetGeometry;
use crate::snap::{SnapKey, SnapPoint, SnapTable};

// ============================================================================
// States and Events
// ============================================================================

/// Lifecycle state of the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "snap")]
pub enum SheetState {
    /// Dismissed, not shown
    #[default]
    Closed,
    /// Animating toward a snap
    Settling(SnapKey),
    /// Resting at a snap
    AtRest(SnapKey),
    /// Following the pointer
    Dragging,
}

impl SheetState {
    pub fn is_closed(&self) -> bool {
        matches!(self, SheetState::Closed)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, SheetState::Dragging)
    }

    /// True while settling toward the close snap
    pub fn is_closing(&self) -> bool {
        matches!(self, SheetState::Settling(SnapKey::Close))
    }

    /// Handle an event and return the new state, or None if no transition
    pub fn on_event(&self, event: SheetEvent) -> Option<Self> {
        use SheetEvent::*;
        use SheetState::*;

        match (self, event) {
            (Closed, Open(target)) => Some(Settling(target)),
            (Settling(_) | AtRest(_) | Dragging, SnapTo(target)) => Some(Settling(target)),
            (Settling(SnapKey::Close), SettleComplete) => Some(Closed),
            (Settling(target), SettleComplete) => Some(AtRest(*target)),
            (Settling(target), DragStart) if !target.is_close() => Some(Dragging),
            (AtRest(_), DragStart) => Some(Dragging),
            (Dragging, DragEnd(target)) => Some(Settling(target)),
            (Settling(_), Relayout(target)) => Some(Settling(target)),
            (AtRest(_), Relayout(target)) => Some(AtRest(target)),
            (Settling(_) | AtRest(_) | Dragging, Dismissed) => Some(Closed),
            _ => None,
        }
    }
}

impl fmt::Display for SheetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetState::Closed => f.write_str("closed"),
            SheetState::Settling(key) => write!(f, "settling({key})"),
            SheetState::AtRest(key) => write!(f, "at_rest({key})"),
            SheetState::Dragging => f.write_str("dragging"),
        }
    }
}

/// Inputs driving [`SheetState`] transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetEvent {
    Open(SnapKey),
    SnapTo(SnapKey),
    SettleComplete,
    DragStart,
    DragEnd(SnapKey),
    /// Snap table recomputed under the current snap
    Relayout(SnapKey),
    /// Reached the close snap at rest
    Dismissed,
}

// ============================================================================
// Effects
// ============================================================================

/// How an offset change should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Eased over the configured duration
    Animated,
    /// Applied immediately
    Instant,
}

/// Instruction for the host, returned by every controller input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "effect")]
pub enum Effect {
    /// The sheet began opening
    OpenStart,
    /// Move the offset; supersedes any target in flight
    AnimateTo { value: f32, motion: Motion },
    /// The resting snap changed
    SnapChanged { snap: SnapPoint },
    /// The sheet began closing
    CloseStart,
    /// The sheet finished closing
    CloseEnd,
    /// Whether the backdrop should intercept pointer events
    PointerInterception { enabled: bool },
    /// The sheet takes ownership of the current pointer gesture
    StartDrag,
    /// Whether inner content may scroll
    ContentScroll { enabled: bool },
}

pub type Effects = SmallVec<[Effect; 4]>;

// ============================================================================
// Commands
// ============================================================================

/// Target of a programmatic snap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapKeyOrDefault", into = "SnapKeyOrDefault")]
pub enum SnapTarget {
    /// The table's default snap
    Default,
    Key(SnapKey),
}

impl From<SnapKey> for SnapTarget {
    fn from(key: SnapKey) -> Self {
        SnapTarget::Key(key)
    }
}

impl From<usize> for SnapTarget {
    fn from(index: usize) -> Self {
        SnapTarget::Key(SnapKey::Index(index))
    }
}

impl FromStr for SnapTarget {
    type Err = ParseSnapKeyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim() == "default" {
            return Ok(SnapTarget::Default);
        }
        s.parse().map(SnapTarget::Key)
    }
}

impl fmt::Display for SnapTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapTarget::Default => f.write_str("default"),
            SnapTarget::Key(key) => key.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SnapKeyOrDefault {
    Index(usize),
    Name(String),
}

impl TryFrom<SnapKeyOrDefault> for SnapTarget {
    type Error = ParseSnapKeyError;

    fn try_from(raw: SnapKeyOrDefault) -> std::result::Result<Self, Self::Error> {
        match raw {
            SnapKeyOrDefault::Index(index) => Ok(index.into()),
            SnapKeyOrDefault::Name(name) => name.parse(),
        }
    }
}

impl From<SnapTarget> for SnapKeyOrDefault {
    fn from(target: SnapTarget) -> Self {
        match target {
            SnapTarget::Key(SnapKey::Index(index)) => SnapKeyOrDefault::Index(index),
            other => SnapKeyOrDefault::Name(other.to_string()),
        }
    }
}

/// Options for [`Controller::snap_to`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapOptions {
    /// Ease to the snap instead of jumping
    pub animate: bool,
    /// Fall back to the nearest usable snap when the target is filtered out
    pub nearest: bool,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            animate: true,
            nearest: false,
        }
    }
}

impl SnapOptions {
    pub fn nearest() -> Self {
        Self {
            nearest: true,
            ..Default::default()
        }
    }

    pub fn instant() -> Self {
        Self {
            animate: false,
            ..Default::default()
        }
    }

    fn motion(&self) -> Motion {
        if self.animate {
            Motion::Animated
        } else {
            Motion::Instant
        }
    }
}

/// Permissible offset range while dragging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConstraints {
    /// Most open offset (the max snap)
    pub top: f32,
    /// Least open offset (the min snap)
    pub bottom: f32,
}

impl DragConstraints {
    pub fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(self.top, self.bottom)
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Sheet state machine
#[derive(Debug, Clone)]
pub struct Controller {
    config: SheetConfig,
    geometry: SheetGeometry,
    table: Option<SnapTable>,
    state: SheetState,
    current_snap: Option<SnapPoint>,
    arbiter: Arbiter,
    pending_open: bool,
}

impl Controller {
    pub fn new(config: SheetConfig) -> Self {
        Self {
            config,
            geometry: SheetGeometry::default(),
            table: None,
            state: SheetState::Closed,
            current_snap: None,
            arbiter: Arbiter::new(),
            pending_open: false,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    /// Resolved snap table, once geometry is measured
    pub fn table(&self) -> Option<&SnapTable> {
        self.table.as_ref()
    }

    /// Last snap the sheet settled at or is settling toward
    pub fn current_snap(&self) -> Option<SnapPoint> {
        self.current_snap
    }

    pub fn arbitration_mode(&self) -> ArbitrationMode {
        self.arbiter.mode()
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn content_scroll_enabled(&self) -> bool {
        self.arbiter.content_scroll_enabled()
    }

    /// An `open()` is waiting for geometry
    pub fn is_open_pending(&self) -> bool {
        self.pending_open
    }

    /// Offset range allowed while dragging
    pub fn drag_constraints(&self) -> Option<DragConstraints> {
        self.table.as_ref().map(|table| DragConstraints {
            top: table.max_snap().value,
            bottom: table.min_snap().value,
        })
    }

    /// Backdrop opacity at `offset`
    pub fn backdrop_opacity(&self, offset: f32) -> Option<f32> {
        self.table
            .as_ref()
            .map(|table| backdrop_opacity_with(table, offset, self.config.backdrop_fade_fraction))
    }

    fn is_scroll(&self) -> bool {
        self.table
            .as_ref()
            .and_then(SnapTable::is_scroll)
            .unwrap_or(false)
    }

    // =========================================================================
    // Table Updates
    // =========================================================================

    /// New measured geometry; re-resolves the table
    pub fn set_geometry(&mut self, geometry: SheetGeometry) -> Effects {
        self.geometry = geometry;
        self.recompute()
    }

    /// New configuration; re-resolves the table
    pub fn set_config(&mut self, config: SheetConfig) -> Effects {
        self.config = config;
        self.recompute()
    }

    fn recompute(&mut self) -> Effects {
        self.table = SnapTable::resolve(&self.config.snap, &self.geometry);
        let Some(table) = self.table.as_ref() else {
            tracing::debug!("Sheet geometry not measured yet, snaps unavailable");
            return Effects::new();
        };

        if self.pending_open && self.state.is_closed() {
            tracing::debug!("Geometry available, performing deferred open");
            self.pending_open = false;
            return self.open();
        }

        let Some(previous) = self.current_snap else {
            return Effects::new();
        };
        if self.state.is_closed() {
            return Effects::new();
        }

        let point = table.try_nearest_by_index(previous.index).unwrap_or_else(|err| {
            tracing::warn!("{err} after relayout; using nearest snap to {:.1}", previous.value);
            table.get_nearest_by_coord(previous.value)
        });
        if point == previous {
            return Effects::new();
        }

        self.current_snap = Some(point);
        let mut effects = Effects::new();

        if self.state.is_dragging() {
            tracing::debug!("Relayout during drag, current snap now {}", point.index);
            return effects;
        }

        tracing::debug!(
            "Relayout {} {:.1} -> {} {:.1}",
            previous.index,
            previous.value,
            point.index,
            point.value
        );

        // Silent settle: no snap notification, no easing
        if point.value != previous.value {
            effects.push(Effect::AnimateTo {
                value: point.value,
                motion: Motion::Instant,
            });
        }
        self.transition(SheetEvent::Relayout(point.index));

        effects
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Open to the default snap. Re-snaps to the default when already open.
    pub fn open(&mut self) -> Effects {
        let mut effects = Effects::new();

        let Some(table) = self.table.as_ref() else {
            tracing::debug!("open() before geometry is measured, deferring");
            self.pending_open = true;
            return effects;
        };
        let target = table.default_snap();

        if target.index.is_close() {
            tracing::warn!("no open snap is available, ignoring open()");
            return effects;
        }

        if !self.state.is_closed() {
            self.settle(target, Motion::Animated, &mut effects);
            self.transition(SheetEvent::SnapTo(target.index));
            return effects;
        }

        effects.push(Effect::OpenStart);
        self.settle(target, Motion::Animated, &mut effects);
        self.transition(SheetEvent::Open(target.index));
        effects
    }

    /// Settle to the close snap
    pub fn close(&mut self) -> Effects {
        let mut effects = Effects::new();

        if self.state.is_closed() {
            if self.pending_open {
                tracing::debug!("close() cancels deferred open");
                self.pending_open = false;
            }
            return effects;
        }
        if self.state.is_closing() {
            return effects;
        }

        let Some(table) = self.table.as_ref() else {
            return effects;
        };
        let target = match table.try_nearest_by_index(SnapKey::Close) {
            Ok(point) => point,
            Err(_) => {
                tracing::warn!("close() without a close snap is ignored");
                return effects;
            }
        };

        self.settle(target, Motion::Animated, &mut effects);
        self.transition(SheetEvent::SnapTo(target.index));
        effects
    }

    /// Settle to a snap by key.
    ///
    /// An unreachable key (filtered out, without `nearest`) is a no-op; a key
    /// that never existed is an error when `nearest` is set.
    pub fn snap_to(&mut self, target: SnapTarget, options: SnapOptions) -> Result<Effects> {
        let mut effects = Effects::new();
        let table = self.table.as_ref().ok_or(SheetError::GeometryUnavailable)?;

        let point = match target {
            SnapTarget::Default => Some(table.default_snap()),
            SnapTarget::Key(key) if options.nearest => Some(table.try_nearest_by_index(key)?),
            SnapTarget::Key(key) => table.get_by_index(key),
        };
        let Some(point) = point else {
            tracing::debug!("snap_to({target}) is currently unreachable");
            return Ok(effects);
        };

        if self.state.is_closed() {
            tracing::debug!("snap_to({target}) while closed is ignored");
            return Ok(effects);
        }

        self.settle(point, options.motion(), &mut effects);
        self.transition(SheetEvent::SnapTo(point.index));
        Ok(effects)
    }

    // =========================================================================
    // Gesture Input
    // =========================================================================

    /// Pointer pressed at client `y`
    pub fn pointer_down(&mut self, y: f32) -> Effects {
        let mut effects = Effects::new();
        if self.table.is_none() || self.state.is_closed() || self.state.is_closing() {
            return effects;
        }

        let scrollable = self.is_scroll();
        let content_scroll = self.arbiter.content_scroll_enabled();
        let decision = self.arbiter.pointer_down(y, scrollable);
        if content_scroll {
            effects.push(Effect::ContentScroll { enabled: false });
        }
        if decision == Decision::StartDrag {
            self.start_drag(&mut effects);
        }
        effects
    }

    /// Pointer moved to client `y`; `scroll_at_top` is whether the inner
    /// content is scrolled to its top
    pub fn pointer_move(&mut self, y: f32, scroll_at_top: bool) -> Effects {
        let mut effects = Effects::new();
        if self.table.is_none() || self.state.is_closed() {
            return effects;
        }

        let scrollable = self.is_scroll();
        let dragging = self.state.is_dragging();
        match self.arbiter.pointer_move(y, scrollable, dragging, scroll_at_top) {
            Decision::StartDrag => self.start_drag(&mut effects),
            Decision::ContentScroll(enabled) => effects.push(Effect::ContentScroll { enabled }),
            Decision::Ignore => {}
        }
        effects
    }

    /// Pointer released; ends the pointer session but not the drag
    pub fn pointer_up(&mut self) -> Effects {
        self.arbiter.pointer_up();
        Effects::new()
    }

    /// Drag released at `offset` with residual `velocity`
    pub fn drag_end(&mut self, offset: f32, velocity: f32) -> Effects {
        let mut effects = Effects::new();
        if !self.state.is_dragging() {
            return effects;
        }
        let Some(table) = self.table.as_ref() else {
            // Geometry went away mid-drag: return to the last snap
            if let Some(previous) = self.current_snap {
                tracing::warn!(
                    "Drag released without snap geometry, returning to {}",
                    previous.index
                );
                self.settle(previous, Motion::Animated, &mut effects);
                self.transition(SheetEvent::DragEnd(previous.index));
            }
            return effects;
        };

        if let Some(close) = table.close_snap() {
            if offset >= close.value && velocity == 0.0 {
                tracing::debug!("Drag released at close ({offset:.1}), closing immediately");
                self.dismiss(close, true, &mut effects);
                return effects;
            }
        }

        let target = table.get_nearest_by_coord(offset);
        tracing::debug!(
            "Drag released at {:.1} (v={:.1}), settling to {}",
            offset,
            velocity,
            target.index
        );
        self.settle(target, Motion::Animated, &mut effects);
        self.transition(SheetEvent::DragEnd(target.index));
        effects
    }

    /// Live offset/velocity sample from the animation primitive
    pub fn sample(&mut self, offset: f32, velocity: f32) -> Effects {
        let mut effects = Effects::new();
        let Some(table) = self.table.as_ref() else {
            return effects;
        };

        self.arbiter
            .update_mode(offset, table, self.config.arbitration_tolerance);

        let Some(close) = table.close_snap() else {
            return effects;
        };
        if offset < close.value || velocity != 0.0 {
            return effects;
        }

        match self.state {
            SheetState::AtRest(_) => {
                tracing::debug!("Sheet came to rest at close ({offset:.1})");
                self.dismiss(close, true, &mut effects);
            }
            SheetState::Settling(SnapKey::Close) => {
                self.dismiss(close, false, &mut effects);
            }
            _ => {}
        }
        effects
    }

    /// The animation toward the current target finished
    pub fn animation_complete(&mut self) -> Effects {
        let mut effects = Effects::new();
        match self.state {
            SheetState::Settling(SnapKey::Close) => {
                if self.transition(SheetEvent::SettleComplete) {
                    effects.push(Effect::CloseEnd);
                }
            }
            SheetState::Settling(_) => {
                self.transition(SheetEvent::SettleComplete);
            }
            _ => {}
        }
        effects
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn transition(&mut self, event: SheetEvent) -> bool {
        match self.state.on_event(event) {
            Some(next) => {
                tracing::debug!("Sheet {} -> {} ({:?})", self.state, next, event);
                self.state = next;
                true
            }
            None => {
                tracing::trace!("Sheet ignored {:?} in {}", event, self.state);
                false
            }
        }
    }

    fn start_drag(&mut self, effects: &mut Effects) {
        if self.transition(SheetEvent::DragStart) {
            effects.push(Effect::StartDrag);
        }
    }

    /// Record `point` and push the effects of settling to it
    fn settle(&mut self, point: SnapPoint, motion: Motion, effects: &mut Effects) {
        self.current_snap = Some(point);
        effects.push(Effect::SnapChanged { snap: point });

        if point.index.is_close() {
            if self.config.backdrop_block {
                effects.push(Effect::PointerInterception { enabled: false });
            }
            effects.push(Effect::CloseStart);
        } else if self.config.backdrop_block {
            effects.push(Effect::PointerInterception { enabled: true });
        }

        effects.push(Effect::AnimateTo {
            value: point.value,
            motion,
        });
    }

    /// Finish at the close snap. `announce` emits the close-start sequence
    /// for sheets that were not already closing.
    fn dismiss(&mut self, close: SnapPoint, announce: bool, effects: &mut Effects) {
        if announce {
            self.settle(close, Motion::Instant, effects);
        }
        if self.transition(SheetEvent::Dismissed) {
            effects.push(Effect::CloseEnd);
        }
    }
}
