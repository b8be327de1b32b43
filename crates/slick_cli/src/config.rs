//! Sheet file handling (sheet.toml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slick_sheet::{SheetConfig, SheetGeometry};
use std::fs;
use std::path::Path;

/// A sheet description: configuration plus optional starting geometry
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SheetFile {
    #[serde(default)]
    pub sheet: SheetConfig,
    /// Geometry applied before the first scenario step
    #[serde(default)]
    pub geometry: Option<SheetGeometry>,
}

impl SheetFile {
    /// Parse a sheet file from TOML text
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).context("Failed to parse sheet file")
    }

    /// Load a sheet file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid sheet file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slick_sheet::{CloseSnap, DefaultSnap};

    #[test]
    fn test_full_sheet_file() {
        let file = SheetFile::from_toml(
            r#"
            [sheet]
            snaps = [0.5, 320]
            default_snap = 0
            use_close_snap = 40
            backdrop_block = false

            [sheet.motion]
            animation_ms = 120
            easing = "ease_in_out"

            [geometry]
            container_height = 800
            content_height = 1400
            header_height = 56
            "#,
        )
        .unwrap();

        assert_eq!(file.sheet.snap.snaps, vec![0.5, 320.0]);
        assert_eq!(file.sheet.snap.default_snap, DefaultSnap::Index(0));
        assert_eq!(file.sheet.snap.use_close_snap, CloseSnap::Distance(40.0));
        assert!(!file.sheet.backdrop_block);
        assert_eq!(file.sheet.motion.animation_ms, 120);

        let geometry = file.geometry.unwrap();
        assert_eq!(geometry.container_height, Some(800.0));
        assert_eq!(geometry.header_height, 56.0);
        assert_eq!(geometry.footer_height, 0.0);
    }

    #[test]
    fn test_empty_sheet_file_uses_defaults() {
        let file = SheetFile::from_toml("").unwrap();
        assert_eq!(file.sheet, SheetConfig::default());
        assert!(file.geometry.is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(SheetFile::from_toml("[sheet]\nsnaps = \"half\"").is_err());
        assert!(SheetFile::from_toml("[sheet]\ndefault_snap = \"top\"").is_err());
    }
}
