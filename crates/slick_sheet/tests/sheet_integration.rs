//! Integration tests for the bottom sheet
//!
//! These drive a [`BottomSheet`] the way a host would: geometry updates,
//! commands, pointer events and animation ticks, checking that:
//! - snap tables resolve the documented scenarios
//! - gestures hand over between content scroll and sheet drag mid-gesture
//! - relayouts move the sheet without notifications or animation
//! - notifications arrive in transition order

use slick_sheet::prelude::*;
use std::sync::{Arc, Mutex};

fn settle(sheet: &mut BottomSheet) {
    for _ in 0..200 {
        sheet.tick(16.0);
        if !sheet.is_animating() {
            break;
        }
    }
    // One more frame so the velocity sample reads zero
    sheet.tick(16.0);
}

/// Notifications as strings, in delivery order
fn recorder() -> (SheetCallbacks, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
    let callbacks = SheetCallbacks::new()
        .on_open_start(move || a.lock().unwrap().push("open_start".into()))
        .on_close_start(move || b.lock().unwrap().push("close_start".into()))
        .on_close_end(move || c.lock().unwrap().push("close_end".into()))
        .on_snap(move |snap| d.lock().unwrap().push(format!("snap:{}", snap.index)));
    (callbacks, log)
}

#[test]
fn test_mixed_snap_scenario() {
    let config = SnapConfig::with_snaps([250.0, 0.5, -100.0]).auto_snap_as_max(false);
    let table = SnapTable::resolve(&config, &SheetGeometry::new(600.0, 450.0)).unwrap();

    let original = table.original_map();
    assert_eq!(original[&SnapKey::Index(0)], -250.0);
    assert_eq!(original[&SnapKey::Index(1)], -300.0);
    assert_eq!(original[&SnapKey::Index(2)], 100.0);
    assert_eq!(original[&SnapKey::Close], 0.0);
    assert_eq!(original[&SnapKey::Auto], -450.0);

    assert!(!table.processed_map().contains_key(&SnapKey::Index(2)));
    assert_eq!(table.max_snap().index, SnapKey::Auto);
    assert_eq!(table.min_snap().index, SnapKey::Close);
    assert_eq!(table.min_snap_except_close().index, SnapKey::Index(0));
}

#[test]
fn test_tall_snap_with_short_content() {
    let config = SnapConfig::with_snaps([0.9]).auto_snap_as_max(false);
    let table = SnapTable::resolve(&config, &SheetGeometry::new(1000.0, 400.0)).unwrap();

    assert_eq!(table.get_by_index(SnapKey::Auto).unwrap().value, -400.0);
    assert_eq!(table.get_by_index(SnapKey::Index(0)).unwrap().value, -900.0);
    assert_eq!(table.max_snap(), SnapPoint::new(SnapKey::Index(0), -900.0));
}

#[test]
fn test_release_between_snaps_settles_to_nearer() {
    let config = SnapConfig::with_snaps([200.0, 400.0])
        .auto_snap(false)
        .auto_snap_as_max(false);
    let mut sheet = BottomSheet::new(SheetConfig::new(config));
    sheet.set_geometry(SheetGeometry::new(800.0, 1000.0));
    sheet.open();
    settle(&mut sheet);
    assert_eq!(sheet.state(), SheetState::AtRest(SnapKey::Index(1)));

    sheet.pointer_down(500.0);
    sheet.drag_to(-260.0);
    sheet.pointer_up();
    settle(&mut sheet);
    assert_eq!(sheet.current_snap().unwrap().index, SnapKey::Index(0));

    // Exact midpoint: first in table order wins
    sheet.pointer_down(500.0);
    sheet.drag_to(-300.0);
    sheet.pointer_up();
    settle(&mut sheet);
    assert_eq!(sheet.state(), SheetState::AtRest(SnapKey::Index(0)));
    assert_eq!(sheet.offset(), -200.0);
}

#[test]
fn test_pull_down_from_scroll_top_takes_over_mid_gesture() {
    let mut sheet = BottomSheet::new(SheetConfig::new(SnapConfig::default()));
    sheet.set_geometry(SheetGeometry::new(700.0, 2400.0));
    sheet.open();
    settle(&mut sheet);

    let table = sheet.snap_table().unwrap();
    assert_eq!(table.is_scroll(), Some(true));
    assert_eq!(sheet.offset(), table.max_snap().value);

    // Press while fully open: content may still claim the gesture
    sheet.pointer_down(300.0);
    assert_eq!(sheet.state(), SheetState::AtRest(SnapKey::Auto));

    // Content scrolls up first...
    sheet.pointer_move(280.0, false);
    assert!(sheet.content_scroll_enabled());
    sheet.pointer_up();

    // ...then a fresh pull-down at the scroll top becomes a sheet drag
    sheet.pointer_down(300.0);
    assert!(!sheet.content_scroll_enabled());
    sheet.pointer_move(310.0, true);
    assert!(sheet.state().is_dragging());

    sheet.drag_to(-690.0);
    sheet.pointer_move(320.0, true);
    sheet.drag_to(-40.0);
    sheet.pointer_up();
    assert!(sheet.state().is_closing());
    settle(&mut sheet);
    assert!(sheet.state().is_closed());
}

#[test]
fn test_partially_open_sheet_owns_every_gesture() {
    let config = SnapConfig::with_snaps([0.4]);
    let mut sheet = BottomSheet::new(SheetConfig::instant(config));
    sheet.set_geometry(SheetGeometry::new(1000.0, 3000.0));
    sheet.open();
    sheet.snap_to(SnapKey::Index(0), SnapOptions::default()).unwrap();
    sheet.tick(16.0);
    assert_eq!(sheet.offset(), -400.0);

    sheet.pointer_down(600.0);
    assert!(sheet.state().is_dragging());
    sheet.pointer_move(560.0, false);
    assert!(!sheet.content_scroll_enabled());
}

#[test]
fn test_content_shrink_is_silent_relayout() {
    let (callbacks, log) = recorder();
    let mut sheet = BottomSheet::new(SheetConfig::new(SnapConfig::default())).with_callbacks(callbacks);
    sheet.set_geometry(SheetGeometry::new(900.0, 600.0).with_header(40.0));
    sheet.open();
    settle(&mut sheet);
    assert_eq!(sheet.offset(), -640.0);

    sheet.set_geometry(SheetGeometry::new(900.0, 300.0).with_header(40.0));
    assert_eq!(sheet.offset(), -340.0);
    assert!(!sheet.is_animating());
    assert_eq!(sheet.state(), SheetState::AtRest(SnapKey::Auto));

    assert_eq!(*log.lock().unwrap(), vec!["open_start", "snap:auto"]);
}

#[test]
fn test_notifications_follow_transition_order() {
    let (callbacks, log) = recorder();
    let config = SnapConfig::with_snaps([0.3]).auto_snap_as_max(false);
    let mut sheet = BottomSheet::new(SheetConfig::new(config)).with_callbacks(callbacks);
    sheet.set_geometry(SheetGeometry::new(1000.0, 800.0));

    sheet.open();
    settle(&mut sheet);
    sheet.snap_to(SnapKey::Index(0), SnapOptions::default()).unwrap();
    // Superseded before it finishes
    sheet.tick(16.0);
    sheet.snap_to(SnapTarget::Default, SnapOptions::default()).unwrap();
    settle(&mut sheet);
    sheet.backdrop_tap();
    settle(&mut sheet);

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "open_start",
            "snap:auto",
            "snap:0",
            "snap:auto",
            "snap:close",
            "close_start",
            "close_end",
        ]
    );
    assert!(sheet.state().is_closed());
    assert!(!sheet.pointer_interception());
}

#[test]
fn test_backdrop_fades_with_offset() {
    let mut sheet = BottomSheet::new(SheetConfig::instant(SnapConfig::default()));
    assert_eq!(sheet.backdrop_opacity(), 0.0);

    sheet.set_geometry(SheetGeometry::new(800.0, 600.0));
    sheet.open();
    assert_eq!(sheet.backdrop_opacity(), 1.0);

    sheet.pointer_down(0.0);
    sheet.drag_to(-100.0);
    assert!((sheet.backdrop_opacity() - 0.5).abs() < 1e-6);
}

#[test]
fn test_without_close_snap_sheet_stays_open() {
    let config = SnapConfig::with_snaps([0.5]).close_snap(false);
    let mut sheet = BottomSheet::new(SheetConfig::instant(config));
    sheet.set_geometry(SheetGeometry::new(800.0, 800.0));
    sheet.open();

    sheet.escape();
    assert_eq!(sheet.state(), SheetState::AtRest(SnapKey::Auto));

    sheet.pointer_down(0.0);
    sheet.drag_to(0.0);
    assert_eq!(sheet.offset(), -400.0);
    sheet.pointer_up();
    assert_eq!(sheet.state(), SheetState::AtRest(SnapKey::Index(0)));
}

#[test]
fn test_invalid_snap_reference_is_reported() {
    let mut sheet = BottomSheet::new(SheetConfig::instant(SnapConfig::default()));
    sheet.set_geometry(SheetGeometry::new(800.0, 300.0));
    sheet.open();

    let err = sheet
        .snap_to(SnapKey::Index(9), SnapOptions::nearest())
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid snap point index 9");
    assert_eq!(sheet.state(), SheetState::AtRest(SnapKey::Auto));
}
