//! Bottom sheet host driver
//!
//! [`BottomSheet`] wires a [`Controller`] to an [`OffsetAnimator`] and the
//! host's callbacks. It performs the controller's effects in order, feeds
//! velocity samples back on every [`tick`](BottomSheet::tick), and exposes the
//! public command surface.
//!
//! # Example
//!
//! ```rust
//! use slick_sheet::prelude::*;
//!
//! let mut sheet = BottomSheet::new(SheetConfig::new(SnapConfig::with_snaps([0.5])));
//! sheet.set_geometry(SheetGeometry::new(800.0, 1200.0));
//! sheet.open();
//!
//! while sheet.is_animating() {
//!     sheet.tick(16.0);
//! }
//! assert_eq!(sheet.state(), SheetState::AtRest(SnapKey::Auto));
//! assert_eq!(sheet.offset(), -800.0);
//! ```

use slick_animation::{Tween, VelocityTracker};

use crate::config::{MotionConfig, SheetConfig};
use crate::controller::{
    Controller, DragConstraints, Effect, Effects, Motion, SheetState, SnapOptions, SnapTarget,
};
use crate::error::Result;
use crate::geometry::SheetGeometry;
use crate::snap::{SnapPoint, SnapTable};

// ============================================================================
// Offset Animator
// ============================================================================

/// The animated scalar offset the sheet is positioned by
pub trait OffsetAnimator {
    /// Current offset
    fn offset(&self) -> f32;

    /// Animate toward `target`, superseding any target in flight
    fn animate_to(&mut self, target: f32, motion: &MotionConfig);

    /// Move to `offset` immediately
    fn jump_to(&mut self, offset: f32);

    /// Stop where the offset currently is
    fn stop(&mut self);

    /// Advance by `dt_ms`; returns true while still animating
    fn tick(&mut self, dt_ms: f32) -> bool;

    fn is_animating(&self) -> bool;
}

impl OffsetAnimator for Tween {
    fn offset(&self) -> f32 {
        self.value()
    }

    fn animate_to(&mut self, target: f32, motion: &MotionConfig) {
        Tween::animate_to(self, target, motion.animation_ms, motion.easing);
    }

    fn jump_to(&mut self, offset: f32) {
        Tween::jump_to(self, offset);
    }

    fn stop(&mut self) {
        Tween::stop(self);
    }

    fn tick(&mut self, dt_ms: f32) -> bool {
        Tween::tick(self, dt_ms)
    }

    fn is_animating(&self) -> bool {
        self.is_playing()
    }
}

// ============================================================================
// Callbacks
// ============================================================================

pub type SheetCallback = Box<dyn FnMut() + Send>;
pub type SnapCallback = Box<dyn FnMut(SnapPoint) + Send>;

/// Host notifications, delivered in transition order
#[derive(Default)]
pub struct SheetCallbacks {
    pub on_open_start: Option<SheetCallback>,
    pub on_close_start: Option<SheetCallback>,
    pub on_close_end: Option<SheetCallback>,
    pub on_snap: Option<SnapCallback>,
}

impl SheetCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open_start(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_open_start = Some(Box::new(f));
        self
    }

    pub fn on_close_start(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_close_start = Some(Box::new(f));
        self
    }

    pub fn on_close_end(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_close_end = Some(Box::new(f));
        self
    }

    pub fn on_snap(mut self, f: impl FnMut(SnapPoint) + Send + 'static) -> Self {
        self.on_snap = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for SheetCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetCallbacks")
            .field("on_open_start", &self.on_open_start.is_some())
            .field("on_close_start", &self.on_close_start.is_some())
            .field("on_close_end", &self.on_close_end.is_some())
            .field("on_snap", &self.on_snap.is_some())
            .finish()
    }
}

// ============================================================================
// Bottom Sheet
// ============================================================================

/// A bottom sheet driven by an offset animator
pub struct BottomSheet<A: OffsetAnimator = Tween> {
    controller: Controller,
    animator: A,
    velocity: VelocityTracker,
    callbacks: SheetCallbacks,
    pointer_interception: bool,
    /// An `AnimateTo` was issued and its completion not yet reported
    awaiting_settle: bool,
}

impl BottomSheet<Tween> {
    /// Sheet animated by a [`Tween`] starting at the closed baseline
    pub fn new(config: SheetConfig) -> Self {
        Self::with_animator(config, Tween::new(0.0))
    }
}

impl<A: OffsetAnimator> BottomSheet<A> {
    pub fn with_animator(config: SheetConfig, animator: A) -> Self {
        let mut velocity = VelocityTracker::new();
        velocity.reset(animator.offset());
        Self {
            controller: Controller::new(config),
            animator,
            velocity,
            callbacks: SheetCallbacks::default(),
            pointer_interception: false,
            awaiting_settle: false,
        }
    }

    pub fn with_callbacks(mut self, callbacks: SheetCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn set_callbacks(&mut self, callbacks: SheetCallbacks) {
        self.callbacks = callbacks;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> SheetState {
        self.controller.state()
    }

    /// Live offset
    pub fn offset(&self) -> f32 {
        self.animator.offset()
    }

    /// Smoothed offset velocity in units per second
    pub fn velocity(&self) -> f32 {
        self.velocity.velocity()
    }

    pub fn current_snap(&self) -> Option<SnapPoint> {
        self.controller.current_snap()
    }

    pub fn snap_table(&self) -> Option<&SnapTable> {
        self.controller.table()
    }

    pub fn config(&self) -> &SheetConfig {
        self.controller.config()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Backdrop opacity at the live offset (0 until geometry is measured)
    pub fn backdrop_opacity(&self) -> f32 {
        self.controller
            .backdrop_opacity(self.animator.offset())
            .unwrap_or(0.0)
    }

    pub fn content_scroll_enabled(&self) -> bool {
        self.controller.content_scroll_enabled()
    }

    /// Whether the backdrop currently intercepts pointer events
    pub fn pointer_interception(&self) -> bool {
        self.pointer_interception
    }

    pub fn drag_constraints(&self) -> Option<DragConstraints> {
        self.controller.drag_constraints()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn open(&mut self) {
        let effects = self.controller.open();
        self.apply(effects);
    }

    pub fn close(&mut self) {
        let effects = self.controller.close();
        self.apply(effects);
    }

    pub fn snap_to(&mut self, target: impl Into<SnapTarget>, options: SnapOptions) -> Result<()> {
        let effects = self.controller.snap_to(target.into(), options)?;
        self.apply(effects);
        Ok(())
    }

    pub fn set_geometry(&mut self, geometry: SheetGeometry) {
        let effects = self.controller.set_geometry(geometry);
        self.apply(effects);
    }

    pub fn set_config(&mut self, config: SheetConfig) {
        let effects = self.controller.set_config(config);
        self.apply(effects);
    }

    /// Close when the backdrop is tapped, if configured to
    pub fn backdrop_tap(&mut self) {
        if self.controller.config().close_on_backdrop_tap {
            self.close();
        }
    }

    /// Escape key: always closes
    pub fn escape(&mut self) {
        self.close();
    }

    // =========================================================================
    // Gesture Input
    // =========================================================================

    pub fn pointer_down(&mut self, y: f32) {
        let effects = self.controller.pointer_down(y);
        self.apply(effects);
    }

    pub fn pointer_move(&mut self, y: f32, scroll_at_top: bool) {
        let effects = self.controller.pointer_move(y, scroll_at_top);
        self.apply(effects);
    }

    /// Release the pointer, ending any drag at the live offset
    pub fn pointer_up(&mut self) {
        let effects = self.controller.pointer_up();
        self.apply(effects);
        if self.state().is_dragging() {
            self.drag_end();
        }
    }

    /// Move the sheet while dragging; clamped to the drag constraints
    pub fn drag_to(&mut self, offset: f32) {
        if !self.state().is_dragging() {
            return;
        }
        let clamped = match self.controller.drag_constraints() {
            Some(constraints) => constraints.clamp(offset),
            None => offset,
        };
        self.animator.jump_to(clamped);
    }

    /// End the drag at the live offset and velocity
    pub fn drag_end(&mut self) {
        let effects = self
            .controller
            .drag_end(self.animator.offset(), self.velocity.velocity());
        self.apply(effects);
    }

    /// Advance time by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        let running = self.animator.tick(dt_ms);
        let offset = self.animator.offset();
        let velocity = self.velocity.sample(offset, dt_ms);

        tracing::trace!("Sheet tick offset={:.1} v={:.1}", offset, velocity);

        if self.awaiting_settle && !running {
            self.awaiting_settle = false;
            let effects = self.controller.animation_complete();
            self.apply(effects);
        }

        let effects = self.controller.sample(offset, velocity);
        self.apply(effects);
    }

    // =========================================================================
    // Effects
    // =========================================================================

    fn apply(&mut self, effects: Effects) {
        for effect in effects {
            match effect {
                Effect::OpenStart => {
                    self.animator.jump_to(0.0);
                    self.velocity.reset(0.0);
                    if let Some(callback) = self.callbacks.on_open_start.as_mut() {
                        callback();
                    }
                }
                Effect::AnimateTo { value, motion } => {
                    match motion {
                        Motion::Animated => {
                            let config = self.controller.config().motion;
                            self.animator.animate_to(value, &config);
                            if !self.animator.is_animating() {
                                self.velocity.reset(value);
                            }
                        }
                        Motion::Instant => {
                            self.animator.jump_to(value);
                            self.velocity.reset(value);
                        }
                    }
                    self.awaiting_settle = true;
                }
                Effect::SnapChanged { snap } => {
                    if let Some(callback) = self.callbacks.on_snap.as_mut() {
                        callback(snap);
                    }
                }
                Effect::CloseStart => {
                    if let Some(callback) = self.callbacks.on_close_start.as_mut() {
                        callback();
                    }
                }
                Effect::CloseEnd => {
                    self.awaiting_settle = false;
                    if let Some(callback) = self.callbacks.on_close_end.as_mut() {
                        callback();
                    }
                }
                Effect::PointerInterception { enabled } => {
                    self.pointer_interception = enabled;
                }
                Effect::StartDrag => {
                    self.animator.stop();
                    self.awaiting_settle = false;
                }
                Effect::ContentScroll { enabled } => {
                    tracing::trace!("Content scroll {}", if enabled { "on" } else { "off" });
                }
            }
        }

        // Jumps finish without a tick
        if self.awaiting_settle && !self.animator.is_animating() {
            self.awaiting_settle = false;
            let effects = self.controller.animation_complete();
            self.apply(effects);
        }
    }
}

impl<A: OffsetAnimator + std::fmt::Debug> std::fmt::Debug for BottomSheet<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BottomSheet")
            .field("controller", &self.controller)
            .field("animator", &self.animator)
            .field("callbacks", &self.callbacks)
            .field("pointer_interception", &self.pointer_interception)
            .finish()
    }
}
