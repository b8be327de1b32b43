//! Human and JSON renderings of a resolved snap table

use serde::Serialize;
use slick_sheet::{SnapKey, SnapTable};
use std::fmt::Write;

/// One usable snap with its derived roles
#[derive(Debug, Clone, Serialize)]
pub struct SnapRow {
    pub key: SnapKey,
    pub value: f32,
    pub roles: Vec<&'static str>,
}

/// Serializable view of a snap table
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub container_height: f32,
    pub content_extent: f32,
    pub is_scroll: Option<bool>,
    /// Candidates removed by filtering
    pub filtered: Vec<SnapKey>,
    pub snaps: Vec<SnapRow>,
}

impl TableSummary {
    pub fn new(table: &SnapTable) -> Self {
        let snaps = table
            .points()
            .map(|point| {
                let mut roles = Vec::new();
                if point == table.min_snap() {
                    roles.push("min");
                }
                if point == table.max_snap() {
                    roles.push("max");
                }
                if point == table.default_snap() {
                    roles.push("default");
                }
                SnapRow {
                    key: point.index,
                    value: point.value,
                    roles,
                }
            })
            .collect();

        let filtered = table
            .original_map()
            .keys()
            .filter(|key| !table.processed_map().contains_key(*key))
            .copied()
            .collect();

        Self {
            container_height: table.container_height(),
            content_extent: table.content_extent(),
            is_scroll: table.is_scroll(),
            filtered,
            snaps,
        }
    }

    /// Plain-text table for terminals
    pub fn render(&self) -> String {
        let mut out = String::new();
        let scroll = match self.is_scroll {
            Some(true) => "yes",
            Some(false) => "no",
            None => "n/a",
        };
        let _ = writeln!(
            out,
            "container {:.0}  content {:.0}  scroll {}",
            self.container_height, self.content_extent, scroll
        );
        for row in &self.snaps {
            let key = row.key.to_string();
            if row.roles.is_empty() {
                let _ = writeln!(out, "  {key:<6} {:>8.1}", row.value);
            } else {
                let _ = writeln!(out, "  {key:<6} {:>8.1}  ({})", row.value, row.roles.join(", "));
            }
        }
        if !self.filtered.is_empty() {
            let keys: Vec<String> = self.filtered.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "filtered: {}", keys.join(", "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slick_sheet::{SheetGeometry, SnapConfig};

    #[test]
    fn test_summary_roles_and_filtered() {
        let config = SnapConfig::with_snaps([250.0, 0.5, -100.0]).auto_snap_as_max(false);
        let table = SnapTable::resolve(&config, &SheetGeometry::new(600.0, 450.0)).unwrap();
        let summary = TableSummary::new(&table);

        assert_eq!(summary.filtered, vec![SnapKey::Index(2)]);
        assert_eq!(summary.snaps.len(), 4);
        let auto = summary.snaps.iter().find(|row| row.key == SnapKey::Auto).unwrap();
        assert_eq!(auto.roles, vec!["max", "default"]);

        let text = summary.render();
        assert!(text.starts_with("container 600  content 450  scroll no"));
        assert!(text.contains("close"));
        assert!(text.contains("filtered: 2"));
    }
}
