//! Sheet configuration
//!
//! [`SnapConfig`] is everything the snap model needs; [`SheetConfig`] adds
//! the motion and interaction settings the controller and host driver use.
//! Both deserialize from TOML/JSON with every field optional:
//!
//! ```toml
//! snaps = [0.5, 0.9]
//! default_snap = 0          # or "auto"
//! use_close_snap = true     # or false, or a distance such as 48
//! auto_snap_as_max = false
//! max_snap_as_max = false
//!
//! [motion]
//! animation_ms = 250
//! easing = "ease_out"
//! ```

use serde::{Deserialize, Serialize};
use slick_animation::Easing;

// ============================================================================
// Snap Configuration
// ============================================================================

/// Which snap the sheet opens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDefaultSnap", into = "RawDefaultSnap")]
pub enum DefaultSnap {
    /// The synthesized content-fitting snap
    #[default]
    Auto,
    /// An index into [`SnapConfig::snaps`]
    Index(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawDefaultSnap {
    Index(usize),
    Name(String),
}

impl TryFrom<RawDefaultSnap> for DefaultSnap {
    type Error = String;

    fn try_from(raw: RawDefaultSnap) -> Result<Self, Self::Error> {
        match raw {
            RawDefaultSnap::Index(index) => Ok(DefaultSnap::Index(index)),
            RawDefaultSnap::Name(name) if name == "auto" => Ok(DefaultSnap::Auto),
            RawDefaultSnap::Name(name) => name
                .parse::<usize>()
                .map(DefaultSnap::Index)
                .map_err(|_| format!("default_snap must be \"auto\" or an index, got '{name}'")),
        }
    }
}

impl From<DefaultSnap> for RawDefaultSnap {
    fn from(snap: DefaultSnap) -> Self {
        match snap {
            DefaultSnap::Auto => RawDefaultSnap::Name("auto".to_string()),
            DefaultSnap::Index(index) => RawDefaultSnap::Index(index),
        }
    }
}

/// Whether (and where) a close snap is synthesized
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCloseSnap", into = "RawCloseSnap")]
pub enum CloseSnap {
    /// No close snap; the sheet cannot be dismissed by dragging
    Disabled,
    /// Close snap at offset 0 (fully dismissed)
    #[default]
    Baseline,
    /// Close snap at the given distance from the baseline
    Distance(f32),
}

impl CloseSnap {
    /// Offset of the close snap, if one is synthesized
    pub fn offset(&self) -> Option<f32> {
        match self {
            CloseSnap::Disabled => None,
            CloseSnap::Baseline => Some(0.0),
            CloseSnap::Distance(distance) => Some(-distance),
        }
    }
}

impl From<bool> for CloseSnap {
    fn from(enabled: bool) -> Self {
        if enabled {
            CloseSnap::Baseline
        } else {
            CloseSnap::Disabled
        }
    }
}

impl From<f32> for CloseSnap {
    fn from(distance: f32) -> Self {
        CloseSnap::Distance(distance)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCloseSnap {
    Flag(bool),
    Distance(f32),
}

impl TryFrom<RawCloseSnap> for CloseSnap {
    type Error = String;

    fn try_from(raw: RawCloseSnap) -> Result<Self, Self::Error> {
        match raw {
            RawCloseSnap::Flag(flag) => Ok(flag.into()),
            RawCloseSnap::Distance(distance) if distance.is_finite() => Ok(distance.into()),
            RawCloseSnap::Distance(_) => Err("use_close_snap distance must be finite".to_string()),
        }
    }
}

impl From<CloseSnap> for RawCloseSnap {
    fn from(snap: CloseSnap) -> Self {
        match snap {
            CloseSnap::Disabled => RawCloseSnap::Flag(false),
            CloseSnap::Baseline => RawCloseSnap::Flag(true),
            CloseSnap::Distance(distance) => RawCloseSnap::Distance(distance),
        }
    }
}

/// Configuration of the snap model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Explicit snaps. `0..=1`: fraction of container height from the bottom.
    /// Greater than 1: distance in pixels from the bottom.
    pub snaps: Vec<f32>,
    /// Snap used when the sheet opens
    pub default_snap: DefaultSnap,
    /// Synthesize an `auto` snap fitting header + content + footer
    pub use_auto_snap: bool,
    /// Ignore explicit snaps taller than the `auto` snap
    pub auto_snap_as_max: bool,
    /// Ignore the `auto` snap when it is taller than every usable explicit snap
    pub max_snap_as_max: bool,
    /// Synthesize a `close` snap
    pub use_close_snap: CloseSnap,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snaps: Vec::new(),
            default_snap: DefaultSnap::Auto,
            use_auto_snap: true,
            auto_snap_as_max: true,
            max_snap_as_max: false,
            use_close_snap: CloseSnap::Baseline,
        }
    }
}

impl SnapConfig {
    /// Config with the given explicit snaps and defaults for everything else
    pub fn with_snaps(snaps: impl Into<Vec<f32>>) -> Self {
        Self {
            snaps: snaps.into(),
            ..Default::default()
        }
    }

    pub fn default_snap(mut self, snap: DefaultSnap) -> Self {
        self.default_snap = snap;
        self
    }

    pub fn auto_snap(mut self, enabled: bool) -> Self {
        self.use_auto_snap = enabled;
        self
    }

    pub fn auto_snap_as_max(mut self, enabled: bool) -> Self {
        self.auto_snap_as_max = enabled;
        self
    }

    pub fn max_snap_as_max(mut self, enabled: bool) -> Self {
        self.max_snap_as_max = enabled;
        self
    }

    pub fn close_snap(mut self, close: impl Into<CloseSnap>) -> Self {
        self.use_close_snap = close.into();
        self
    }
}

// ============================================================================
// Motion / Interaction Configuration
// ============================================================================

/// Settle animation settings passed to the offset animator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Duration of animated settles in milliseconds
    pub animation_ms: u32,
    /// Easing of animated settles
    pub easing: Easing,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            animation_ms: 300,
            easing: Easing::EaseOut,
        }
    }
}

/// Full sheet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    #[serde(flatten)]
    pub snap: SnapConfig,
    pub motion: MotionConfig,
    /// Whether the backdrop intercepts pointer events while the sheet is open
    pub backdrop_block: bool,
    /// Close the sheet when the backdrop is tapped
    pub close_on_backdrop_tap: bool,
    /// Distance (px) from the min/max snap that still counts as "at" it
    pub arbitration_tolerance: f32,
    /// Fraction of container height over which the backdrop fades in
    pub backdrop_fade_fraction: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            motion: MotionConfig::default(),
            backdrop_block: true,
            close_on_backdrop_tap: true,
            arbitration_tolerance: 30.0,
            backdrop_fade_fraction: 0.25,
        }
    }
}

impl SheetConfig {
    /// Sheet config around the given snap config
    pub fn new(snap: SnapConfig) -> Self {
        Self {
            snap,
            ..Default::default()
        }
    }

    /// Config whose settles are always instantaneous
    pub fn instant(snap: SnapConfig) -> Self {
        Self {
            snap,
            motion: MotionConfig {
                animation_ms: 0,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
