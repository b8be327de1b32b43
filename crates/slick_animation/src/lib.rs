//! Slick Animation Primitives
//!
//! The moving parts a bottom sheet needs from an animation system, and
//! nothing more.
//!
//! # Features
//!
//! - **Tweens**: a single retargetable value; a new target supersedes the one in flight
//! - **Easing**: linear, ease-out and ease-in-out curves
//! - **Velocity sampling**: smoothed rate of change with exact rest detection
//!
//! # Example
//!
//! ```rust
//! use slick_animation::{Easing, Tween, VelocityTracker};
//!
//! let mut offset = Tween::new(0.0);
//! let mut velocity = VelocityTracker::new();
//!
//! offset.animate_to(-320.0, 300, Easing::EaseOut);
//! while offset.tick(16.0) {
//!     velocity.sample(offset.value(), 16.0);
//! }
//! assert_eq!(offset.value(), -320.0);
//! ```

pub mod easing;
pub mod tween;
pub mod velocity;

pub use easing::Easing;
pub use tween::Tween;
pub use velocity::VelocityTracker;
