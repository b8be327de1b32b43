//! Measured sheet geometry
//!
//! Heights come from the host's layout pass. Container and content heights
//! are optional because the first layout may not have happened yet; header
//! and footer default to zero since they are optional regions.

use serde::{Deserialize, Serialize};

/// Measured heights of the sheet regions, in the offset's units (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetGeometry {
    /// Height of the viewport the sheet slides within
    pub container_height: Option<f32>,
    /// Full (scroll) height of the sheet content
    pub content_height: Option<f32>,
    pub header_height: f32,
    pub footer_height: f32,
}

impl SheetGeometry {
    /// Geometry with container and content measured, no header or footer
    pub fn new(container_height: f32, content_height: f32) -> Self {
        Self {
            container_height: Some(container_height),
            content_height: Some(content_height),
            header_height: 0.0,
            footer_height: 0.0,
        }
    }

    pub fn with_header(mut self, height: f32) -> Self {
        self.header_height = height;
        self
    }

    pub fn with_footer(mut self, height: f32) -> Self {
        self.footer_height = height;
        self
    }

    /// True once container and content have both been measured
    pub fn is_measured(&self) -> bool {
        self.container_height.is_some() && self.content_height.is_some()
    }

    /// Container height clamped to a usable, non-negative value
    pub(crate) fn usable_container_height(&self) -> Option<f32> {
        self.container_height.map(sanitize)
    }

    /// Total height of header + content + footer, clamped to non-negative
    pub(crate) fn content_extent(&self) -> Option<f32> {
        self.content_height.map(|content| {
            sanitize(content) + sanitize(self.header_height) + sanitize(self.footer_height)
        })
    }
}

/// Negative or non-finite measurements degenerate to zero
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmeasured_geometry() {
        let geometry = SheetGeometry::default();
        assert!(!geometry.is_measured());
        assert_eq!(geometry.content_extent(), None);

        let geometry = SheetGeometry {
            container_height: Some(600.0),
            ..Default::default()
        };
        assert!(!geometry.is_measured());
    }

    #[test]
    fn test_content_extent_includes_header_and_footer() {
        let geometry = SheetGeometry::new(800.0, 300.0)
            .with_header(40.0)
            .with_footer(60.0);
        assert_eq!(geometry.content_extent(), Some(400.0));
    }

    #[test]
    fn test_malformed_heights_are_clamped() {
        let geometry = SheetGeometry::new(-100.0, f32::NAN).with_header(-5.0);
        assert_eq!(geometry.usable_container_height(), Some(0.0));
        assert_eq!(geometry.content_extent(), Some(0.0));
    }
}
