//! Easing functions for offset tweens

use serde::{Deserialize, Serialize};

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Cubic ease-out, the default for sheet settles
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress (clamped to `0..=1`) onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::EaseInOut if t < 0.5 => 4.0 * t * t * t,
            Easing::EaseInOut => {
                let inv = 2.0 - 2.0 * t;
                1.0 - inv * inv * inv / 2.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseOut.apply(2.0), 1.0);
    }

    #[test]
    fn test_ease_out_leads_linear() {
        assert!(Easing::EaseOut.apply(0.3) > Easing::Linear.apply(0.3));
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        let a = Easing::EaseInOut.apply(0.2);
        let b = Easing::EaseInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_easing_names_in_config() {
        let easing: Easing = serde_json::from_str(r#""ease_in_out""#).unwrap();
        assert_eq!(easing, Easing::EaseInOut);
    }
}
