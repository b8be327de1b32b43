//! Backdrop fade derived from the live offset

use crate::snap::SnapTable;

/// Default fraction of the container over which the backdrop fades in
pub const DEFAULT_FADE_FRACTION: f32 = 0.25;

/// Backdrop opacity for `offset`, using the default fade fraction
pub fn backdrop_opacity(table: &SnapTable, offset: f32) -> f32 {
    backdrop_opacity_with(table, offset, DEFAULT_FADE_FRACTION)
}

/// Backdrop opacity for `offset`.
///
/// Linear from `0` at the closed baseline to `1` at the first real snap, or at
/// `fade_fraction` of the container height if that comes sooner. Clamped to
/// `0..=1`.
pub fn backdrop_opacity_with(table: &SnapTable, offset: f32, fade_fraction: f32) -> f32 {
    let fade_end = table
        .min_snap_except_close()
        .value
        .max(-table.container_height() * fade_fraction);

    if fade_end >= 0.0 {
        return 1.0;
    }

    (offset / fade_end).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapConfig;
    use crate::geometry::SheetGeometry;

    #[test]
    fn test_fades_over_quarter_container() {
        // First real snap at -600, quarter of the container at -200
        let config = SnapConfig::with_snaps([0.75]);
        let table = SnapTable::resolve(&config, &SheetGeometry::new(800.0, 800.0)).unwrap();

        assert_eq!(backdrop_opacity(&table, 0.0), 0.0);
        assert_eq!(backdrop_opacity(&table, -100.0), 0.5);
        assert_eq!(backdrop_opacity(&table, -200.0), 1.0);
        assert_eq!(backdrop_opacity(&table, -700.0), 1.0);
        assert_eq!(backdrop_opacity(&table, 40.0), 0.0);
    }

    #[test]
    fn test_fades_to_nearby_first_snap() {
        let config = SnapConfig::with_snaps([100.0]).auto_snap_as_max(false);
        let table = SnapTable::resolve(&config, &SheetGeometry::new(800.0, 800.0)).unwrap();
        assert_eq!(backdrop_opacity(&table, -50.0), 0.5);
        assert_eq!(backdrop_opacity_with(&table, -50.0, 0.05), 1.0);
    }

    #[test]
    fn test_degenerate_table_is_opaque() {
        let table =
            SnapTable::resolve(&SnapConfig::default(), &SheetGeometry::new(0.0, 0.0)).unwrap();
        assert_eq!(backdrop_opacity(&table, 0.0), 1.0);
    }
}
