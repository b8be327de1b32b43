//! Retargetable single-value tween
//!
//! A [`Tween`] owns one scalar and moves it toward a target over a fixed
//! duration. There is never more than one target in flight: calling
//! [`Tween::animate_to`] while a previous animation is running restarts from
//! the current value toward the new target, so targets supersede rather than
//! queue.

use crate::easing::Easing;

/// Timed tween of a single value toward a target
#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    value: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    playing: bool,
}

impl Tween {
    /// Create a tween resting at `value`
    pub fn new(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            value,
            duration_ms: 0.0,
            elapsed_ms: 0.0,
            easing: Easing::default(),
            playing: false,
        }
    }

    /// Current value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Target of the current (or last) animation
    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Progress of the running animation (1.0 when idle)
    pub fn progress(&self) -> f32 {
        if !self.playing || self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Animate from the current value toward `target`, superseding any
    /// animation in flight. A zero duration jumps immediately.
    pub fn animate_to(&mut self, target: f32, duration_ms: u32, easing: Easing) {
        if duration_ms == 0 {
            self.jump_to(target);
            return;
        }

        if self.playing {
            tracing::trace!(
                "Tween retarget {:.1} -> {:.1} (superseding {:.1})",
                self.value,
                target,
                self.to
            );
        }

        self.from = self.value;
        self.to = target;
        self.duration_ms = duration_ms as f32;
        self.elapsed_ms = 0.0;
        self.easing = easing;
        self.playing = true;
    }

    /// Set the value and target immediately, cancelling any animation
    pub fn jump_to(&mut self, value: f32) {
        self.from = value;
        self.to = value;
        self.value = value;
        self.duration_ms = 0.0;
        self.elapsed_ms = 0.0;
        self.playing = false;
    }

    /// Stop animating, leaving the value where it is
    pub fn stop(&mut self) {
        self.to = self.value;
        self.playing = false;
    }

    /// Advance the animation by delta time (in milliseconds).
    ///
    /// Returns true while the animation is still running.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.playing {
            return false;
        }

        self.elapsed_ms += dt_ms.max(0.0);

        if self.elapsed_ms >= self.duration_ms {
            self.elapsed_ms = self.duration_ms;
            self.value = self.to;
            self.playing = false;
            return false;
        }

        let eased = self.easing.apply(self.elapsed_ms / self.duration_ms);
        self.value = self.from + (self.to - self.from) * eased;
        true
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_reaches_target() {
        let mut tween = Tween::new(0.0);
        tween.animate_to(-300.0, 100, Easing::Linear);
        assert!(tween.is_playing());

        assert!(tween.tick(50.0));
        assert!((tween.value() - -150.0).abs() < 1e-3);

        assert!(!tween.tick(50.0));
        assert_eq!(tween.value(), -300.0);
        assert!(!tween.is_playing());
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut tween = Tween::new(-100.0);
        tween.animate_to(-250.0, 0, Easing::EaseOut);
        assert_eq!(tween.value(), -250.0);
        assert!(!tween.is_playing());
        assert!(!tween.tick(16.0));
    }

    #[test]
    fn test_retarget_supersedes_from_current_value() {
        let mut tween = Tween::new(0.0);
        tween.animate_to(-400.0, 100, Easing::Linear);
        tween.tick(50.0);
        let midway = tween.value();

        tween.animate_to(0.0, 100, Easing::Linear);
        assert_eq!(tween.target(), 0.0);
        assert_eq!(tween.progress(), 0.0);

        tween.tick(50.0);
        assert!((tween.value() - midway / 2.0).abs() < 1e-3);
        tween.tick(60.0);
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn test_stop_keeps_value() {
        let mut tween = Tween::new(0.0);
        tween.animate_to(-100.0, 100, Easing::Linear);
        tween.tick(25.0);
        tween.stop();
        assert!(!tween.is_playing());
        assert_eq!(tween.target(), tween.value());
    }
}
