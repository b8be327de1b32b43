//! Snap point resolution
//!
//! Turns a [`SnapConfig`] plus measured [`SheetGeometry`] into a
//! [`SnapTable`]: the ordered set of named rest offsets the sheet can settle at.
//!
//! # Coordinate convention
//!
//! Offsets are measured from the sheet's fully-closed baseline and are `<= 0`
//! for every reachable snap: `0` is closed, `-container_height` is fully open.
//! A *smaller* (more negative) offset is a *taller*, more open sheet. All sign
//! handling lives in this module; callers only compare offsets.
//!
//! # Table order
//!
//! Candidates are kept in canonical order: explicit snaps in array order, then
//! the synthesized `close`, then `auto`. Nearest-neighbour ties resolve to the
//! first entry in this order.
//!
//! # Example
//!
//! ```rust
//! use slick_sheet::config::SnapConfig;
//! use slick_sheet::geometry::SheetGeometry;
//! use slick_sheet::snap::{SnapKey, SnapTable};
//!
//! let config = SnapConfig::with_snaps([0.5]).auto_snap_as_max(false);
//! let table = SnapTable::resolve(&config, &SheetGeometry::new(800.0, 1200.0)).unwrap();
//!
//! assert_eq!(table.get_by_index(SnapKey::Index(0)).unwrap().value, -400.0);
//! assert_eq!(table.max_snap().index, SnapKey::Auto); // capped at the container
//! assert_eq!(table.min_snap().index, SnapKey::Close);
//! assert_eq!(table.get_nearest_by_coord(-150.0).index, SnapKey::Close);
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{DefaultSnap, SnapConfig};
use crate::error::{ParseSnapKeyError, SnapError};
use crate::geometry::SheetGeometry;

// ============================================================================
// Snap Keys and Points
// ============================================================================

/// Stable identity of a snap across table recomputations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSnapKey", into = "RawSnapKey")]
pub enum SnapKey {
    /// Index into the configured snap list
    Index(usize),
    /// Synthesized fully-dismissed snap
    Close,
    /// Synthesized content-fitting snap
    Auto,
}

impl SnapKey {
    pub fn is_close(&self) -> bool {
        matches!(self, SnapKey::Close)
    }
}

impl fmt::Display for SnapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapKey::Index(index) => write!(f, "{index}"),
            SnapKey::Close => f.write_str("close"),
            SnapKey::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for SnapKey {
    type Err = ParseSnapKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "close" => Ok(SnapKey::Close),
            "auto" => Ok(SnapKey::Auto),
            other => other
                .parse::<usize>()
                .map(SnapKey::Index)
                .map_err(|_| ParseSnapKeyError(s.to_string())),
        }
    }
}

impl From<usize> for SnapKey {
    fn from(index: usize) -> Self {
        SnapKey::Index(index)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSnapKey {
    Index(usize),
    Name(String),
}

impl TryFrom<RawSnapKey> for SnapKey {
    type Error = ParseSnapKeyError;

    fn try_from(raw: RawSnapKey) -> Result<Self, Self::Error> {
        match raw {
            RawSnapKey::Index(index) => Ok(SnapKey::Index(index)),
            RawSnapKey::Name(name) => name.parse(),
        }
    }
}

impl From<SnapKey> for RawSnapKey {
    fn from(key: SnapKey) -> Self {
        match key {
            SnapKey::Index(index) => RawSnapKey::Index(index),
            other => RawSnapKey::Name(other.to_string()),
        }
    }
}

/// A named rest offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapPoint {
    pub index: SnapKey,
    /// Offset from the closed baseline (`<= 0`, more negative = more open)
    pub value: f32,
}

impl SnapPoint {
    pub fn new(index: SnapKey, value: f32) -> Self {
        Self { index, value }
    }
}

// ============================================================================
// Snap Table
// ============================================================================

/// Resolved snap points for one configuration + geometry
#[derive(Debug, Clone, PartialEq)]
pub struct SnapTable {
    original: IndexMap<SnapKey, f32>,
    processed: IndexMap<SnapKey, f32>,
    default_snap: SnapPoint,
    auto_snap: Option<SnapPoint>,
    min_snap: SnapPoint,
    min_snap_except_close: SnapPoint,
    max_snap: SnapPoint,
    is_scroll: Option<bool>,
    container_height: f32,
    content_extent: f32,
}

impl SnapTable {
    /// Resolve the snap table, or `None` while container or content height
    /// is not measured yet.
    ///
    /// Malformed geometry (negative or NaN heights) is clamped to zero and
    /// yields the smallest valid table instead of failing.
    pub fn resolve(config: &SnapConfig, geometry: &SheetGeometry) -> Option<Self> {
        let container_height = geometry.usable_container_height()?;
        let content_extent = geometry.content_extent()?;
        let auto_offset = -content_extent.min(container_height);

        let mut original = IndexMap::new();
        for (index, &value) in config.snaps.iter().enumerate() {
            if !value.is_finite() {
                tracing::warn!("ignoring non-finite snap {value} at index {index}");
                continue;
            }
            original.insert(SnapKey::Index(index), snap_offset(value, container_height));
        }
        if let Some(close) = config.use_close_snap.offset() {
            original.insert(SnapKey::Close, close);
        }
        if config.use_auto_snap {
            original.insert(SnapKey::Auto, auto_offset);
        }

        let mut processed = filter_candidates(&original, container_height, config);

        // Without any usable non-close snap the sheet could never open, so the
        // auto snap is created regardless of configuration.
        if !processed.keys().any(|key| !key.is_close()) && !original.contains_key(&SnapKey::Auto) {
            tracing::debug!("no usable explicit snap; forcing auto snap at {auto_offset:.1}");
            original.insert(SnapKey::Auto, auto_offset);
            processed = filter_candidates(&original, container_height, config);
        }

        let (&first_key, &first_value) = processed.first()?;
        let mut table = Self {
            original,
            processed,
            default_snap: SnapPoint::new(first_key, first_value),
            auto_snap: None,
            min_snap: SnapPoint::new(first_key, first_value),
            min_snap_except_close: SnapPoint::new(first_key, first_value),
            max_snap: SnapPoint::new(first_key, first_value),
            is_scroll: None,
            container_height,
            content_extent,
        };

        let highest = table.processed.values().copied().fold(f32::NEG_INFINITY, f32::max);
        let lowest = table.processed.values().copied().fold(f32::INFINITY, f32::min);
        table.min_snap = table.get_nearest_by_coord(highest);
        table.max_snap = table.get_nearest_by_coord(lowest);

        table.min_snap_except_close = if table.min_snap.index.is_close() {
            let mut values: Vec<f32> = table.processed.values().copied().collect();
            values.sort_by(|a, b| b.total_cmp(a));
            match values.get(1) {
                Some(&second) => table.get_nearest_by_coord(second),
                None => table.min_snap,
            }
        } else {
            table.min_snap
        };

        table.auto_snap = table.try_nearest_by_index(SnapKey::Auto).ok();
        table.is_scroll = table
            .auto_snap
            .map(|_| table.max_snap.value > -content_extent);

        table.default_snap = table.resolve_default(config.default_snap);

        tracing::debug!(
            "Resolved snaps container={:.0} content={:.0}: {}",
            container_height,
            content_extent,
            table
        );

        Some(table)
    }

    fn resolve_default(&self, selector: DefaultSnap) -> SnapPoint {
        let fallback = self.auto_snap.unwrap_or(self.max_snap);
        match selector {
            DefaultSnap::Auto => {
                if self.auto_snap.is_none() {
                    tracing::warn!("default snap is auto but no auto snap exists; using max snap");
                }
                fallback
            }
            DefaultSnap::Index(index) => self
                .try_nearest_by_index(SnapKey::Index(index))
                .unwrap_or_else(|err| {
                    tracing::warn!("default snap: {err}; falling back to {}", fallback.index);
                    fallback
                }),
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Exact lookup among usable snaps.
    ///
    /// `None` means the snap is currently unreachable (filtered out or never
    /// configured); callers should treat that as a no-op.
    pub fn get_by_index(&self, key: SnapKey) -> Option<SnapPoint> {
        self.processed
            .get(&key)
            .map(|&value| SnapPoint::new(key, value))
    }

    /// Usable snap closest to `offset`; ties go to the first in table order
    pub fn get_nearest_by_coord(&self, offset: f32) -> SnapPoint {
        let mut entries = self.processed.iter();
        let (mut best_key, mut best_value) = match entries.next() {
            Some((&key, &value)) => (key, value),
            None => unreachable!("snap table always holds at least one usable snap"),
        };
        let mut min_difference = (offset - best_value).abs();

        for (&key, &value) in entries {
            let difference = (offset - value).abs();
            if difference < min_difference {
                min_difference = difference;
                best_key = key;
                best_value = value;
            }
        }

        SnapPoint::new(best_key, best_value)
    }

    /// The snap named `key`, or the usable snap nearest to it if it was
    /// filtered out.
    pub fn try_nearest_by_index(&self, key: SnapKey) -> Result<SnapPoint, SnapError> {
        if let Some(point) = self.get_by_index(key) {
            return Ok(point);
        }
        match self.original.get(&key) {
            Some(&value) => Ok(self.get_nearest_by_coord(value)),
            None => Err(SnapError::InvalidSnapReference(key)),
        }
    }

    /// Like [`try_nearest_by_index`](Self::try_nearest_by_index) for keys known
    /// to be valid.
    ///
    /// # Panics
    ///
    /// Panics if `key` was never a candidate snap for this configuration.
    pub fn get_nearest_by_index(&self, key: SnapKey) -> SnapPoint {
        match self.try_nearest_by_index(key) {
            Ok(point) => point,
            Err(err) => panic!("{err}"),
        }
    }

    // =========================================================================
    // Derived Snaps
    // =========================================================================

    /// Snap the sheet opens to
    pub fn default_snap(&self) -> SnapPoint {
        self.default_snap
    }

    /// Nearest usable snap to the auto candidate, if one exists
    pub fn auto_snap(&self) -> Option<SnapPoint> {
        self.auto_snap
    }

    /// The close snap, if it is usable
    pub fn close_snap(&self) -> Option<SnapPoint> {
        self.get_by_index(SnapKey::Close)
    }

    /// Least open usable snap (offset closest to zero)
    pub fn min_snap(&self) -> SnapPoint {
        self.min_snap
    }

    /// Least open usable snap that is not `close`
    pub fn min_snap_except_close(&self) -> SnapPoint {
        self.min_snap_except_close
    }

    /// Most open usable snap (most negative offset)
    pub fn max_snap(&self) -> SnapPoint {
        self.max_snap
    }

    /// Whether content stays scrollable at the most open snap.
    ///
    /// `None` when the table has no auto snap candidate.
    pub fn is_scroll(&self) -> Option<bool> {
        self.is_scroll
    }

    // =========================================================================
    // Raw Maps
    // =========================================================================

    /// Every candidate snap before filtering, in table order
    pub fn original_map(&self) -> &IndexMap<SnapKey, f32> {
        &self.original
    }

    /// Usable snaps, in table order
    pub fn processed_map(&self) -> &IndexMap<SnapKey, f32> {
        &self.processed
    }

    /// Usable snaps as points, in table order
    pub fn points(&self) -> impl Iterator<Item = SnapPoint> + '_ {
        self.processed
            .iter()
            .map(|(&key, &value)| SnapPoint::new(key, value))
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    /// Container height the table was resolved against
    pub fn container_height(&self) -> f32 {
        self.container_height
    }

    /// Header + content + footer height the table was resolved against
    pub fn content_extent(&self) -> f32 {
        self.content_extent
    }
}

impl fmt::Display for SnapTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.processed.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value:.1}")?;
        }
        f.write_str("}")
    }
}

// ============================================================================
// Offset Math
// ============================================================================

/// Offset for a configured snap value.
///
/// `0..=1` is a fraction of the container, `> 1` an absolute distance, and a
/// negative value maps to a positive offset that no table ever accepts.
fn snap_offset(value: f32, container_height: f32) -> f32 {
    if value < 0.0 {
        -value
    } else if value <= 1.0 {
        -value * container_height
    } else {
        -value
    }
}

/// Apply the container floor, the max-snap and auto-as-max rules, then close
/// dominance. The synthesized `close` is only ever subject to the floor.
fn filter_candidates(
    original: &IndexMap<SnapKey, f32>,
    container_height: f32,
    config: &SnapConfig,
) -> IndexMap<SnapKey, f32> {
    let mut processed: IndexMap<SnapKey, f32> = original
        .iter()
        .filter(|(_, &value)| value >= -container_height && value <= 0.0)
        .map(|(&key, &value)| (key, value))
        .collect();
    let close = processed.get(&SnapKey::Close).copied();

    if config.max_snap_as_max {
        let tallest_explicit = processed
            .iter()
            .filter(|(key, _)| matches!(key, SnapKey::Index(_)))
            .map(|(_, &value)| value)
            .filter(|value| close.map_or(true, |close| *value < close))
            .min_by(f32::total_cmp);
        if let (Some(tallest), Some(&auto)) = (tallest_explicit, processed.get(&SnapKey::Auto)) {
            if auto < tallest {
                processed.shift_remove(&SnapKey::Auto);
            }
        }
    }

    if config.auto_snap_as_max {
        if let Some(&auto) = original.get(&SnapKey::Auto) {
            processed.retain(|key, value| key.is_close() || *value >= auto);
        }
    }

    if let Some(close) = close {
        processed.retain(|key, value| key.is_close() || *value < close);
    }

    processed
}
