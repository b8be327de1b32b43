//! Velocity sampling for animated values
//!
//! Tracks the rate of change of a value (units per second) from successive
//! samples, smoothed with an exponential moving average the same way touch
//! scrolling smooths finger velocity. A sample that does not move the value
//! reports exactly zero so that consumers can detect rest.

/// Smoothed velocity of a sampled value
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    last_value: Option<f32>,
    velocity: f32,
    /// Smoothing factor for the moving average (0..1, higher = more responsive)
    alpha: f32,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self {
            last_value: None,
            velocity: 0.0,
            alpha: 0.3,
        }
    }

    /// Create a tracker with a custom smoothing factor
    pub fn with_smoothing(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.01, 1.0),
            ..Self::new()
        }
    }

    /// Current smoothed velocity in units per second
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Record a new value observed `dt_ms` after the previous one.
    ///
    /// Returns the updated velocity.
    pub fn sample(&mut self, value: f32, dt_ms: f32) -> f32 {
        let Some(last) = self.last_value.replace(value) else {
            self.velocity = 0.0;
            return 0.0;
        };

        let delta = value - last;
        if delta.abs() <= f32::EPSILON {
            self.velocity = 0.0;
            return 0.0;
        }

        let dt_seconds = dt_ms / 1000.0;
        if dt_seconds <= 0.0 {
            return self.velocity;
        }

        let instant = delta / dt_seconds;
        self.velocity = if self.velocity == 0.0 {
            instant
        } else {
            self.velocity * (1.0 - self.alpha) + instant * self.alpha
        };
        self.velocity
    }

    /// Forget history (e.g. after a jump)
    pub fn reset(&mut self, value: f32) {
        self.last_value = Some(value);
        self.velocity = 0.0;
    }
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}
