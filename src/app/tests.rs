use super::*;
use crate::config::LibrarySettings;
use crate::library::{CoordsSource, PhotoRecord, PhotoStore, SortMode, sample_store};
use crate::map::MapCommand;
use crate::metadata::NoMetadata;
use crate::preview::{DEFAULT_CAPTION, ThumbnailError, ThumbnailSource};
use crate::tree::PhotoTree;
use chrono::NaiveDateTime;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

struct NoThumbs;

impl ThumbnailSource for NoThumbs {
    fn thumbnail(&self, path: &Path, _w: u32, _h: u32) -> Result<RgbaImage, ThumbnailError> {
        Err(ThumbnailError::Missing {
            path: path.to_path_buf(),
        })
    }
}

fn rec(path: &str, minutes: i64, location: &str) -> PhotoRecord {
    PhotoRecord {
        path: PathBuf::from(path),
        latitude: 10.0,
        longitude: 20.0,
        timestamp: NaiveDateTime::default() + chrono::Duration::minutes(minutes),
        location_name: location.to_string(),
        coords_source: CoordsSource::Sample,
    }
}

fn store() -> PhotoStore {
    PhotoStore::new(
        PathBuf::from("/r"),
        vec![
            rec("/r/a/late.jpg", 30, "Amsterdam"),
            rec("/r/a/b/early.jpg", 10, "Zurich"),
            rec("/r/c.jpg", 20, "Berlin"),
        ],
    )
}

fn app_with_channel(store: PhotoStore) -> (App, Receiver<MapCommand>) {
    let mut app = App::new(store, SortMode::ByTime);
    app.set_thumbnail_source(Box::new(NoThumbs));
    let (tx, rx) = mpsc::channel();
    app.set_map_sender(tx);
    (app, rx)
}

fn drain(rx: &Receiver<MapCommand>) -> Vec<MapCommand> {
    rx.try_iter().collect()
}

fn centers(cmds: &[MapCommand]) -> Vec<usize> {
    cmds.iter()
        .filter_map(|c| match c {
            MapCommand::CenterOn(id) => Some(*id),
            _ => None,
        })
        .collect()
}

#[test]
fn new_app_selects_first_leaf_in_sort_order() {
    let (app, rx) = app_with_channel(store());

    // ByTime: early.jpg (index 1) comes first.
    assert_eq!(app.order, vec![1, 2, 0]);
    assert_eq!(app.preview.photo, Some(1));
    assert_eq!(app.selected, app.tree.default_selection());
    assert_eq!(app.rows[app.cursor].id, app.selected.unwrap());

    let cmds = drain(&rx);
    assert!(matches!(&cmds[0], MapCommand::LoadMarkers(m) if m.len() == 3));
    assert_eq!(centers(&cmds), vec![1]);
}

#[test]
fn selecting_a_leaf_centers_map_once_and_previews_it() {
    let (mut app, rx) = app_with_channel(store());
    drain(&rx);

    let leaf = app.tree.find_leaf(2).unwrap();
    app.select_node(Some(leaf));

    let cmds = drain(&rx);
    assert_eq!(cmds, vec![MapCommand::CenterOn(2)]);
    assert_eq!(app.preview.photo, Some(2));
    assert!(app.preview.caption.starts_with("Berlin\n"));
    assert_eq!(app.selected_record().unwrap().location_name, "Berlin");
}

#[test]
fn selecting_a_group_sends_nothing_and_resets_preview() {
    let (mut app, rx) = app_with_channel(store());
    drain(&rx);

    let group = app.tree.child_by_label(PhotoTree::ROOT, "a").unwrap();
    app.select_node(Some(group));

    assert!(drain(&rx).is_empty());
    assert_eq!(app.preview.photo, None);
    assert_eq!(app.preview.caption, DEFAULT_CAPTION);

    app.select_node(None);
    app.select_node(Some(10_000));
    assert!(drain(&rx).is_empty());
    assert_eq!(app.preview.photo, None);
}

#[test]
fn resolve_selection_rejects_out_of_range_back_references() {
    let (mut app, _rx) = app_with_channel(store());
    let leaf = app.tree.find_leaf(0).unwrap();
    assert_eq!(app.resolve_selection(Some(leaf)), Some(0));

    // Same tree over a smaller store: the back-reference no longer resolves.
    app.store = PhotoStore::new(PathBuf::from("/r"), Vec::new());
    assert_eq!(app.resolve_selection(Some(leaf)), None);
    assert_eq!(app.resolve_selection(Some(PhotoTree::ROOT)), None);
}

#[test]
fn toggling_sort_rebuilds_projection_without_touching_store() {
    let (mut app, rx) = app_with_channel(store());
    drain(&rx);
    let paths_before: Vec<PathBuf> = app.store.records().iter().map(|r| r.path.clone()).collect();

    app.toggle_sort_mode();
    assert_eq!(app.sort_mode, SortMode::ByLocation);
    assert_eq!(app.order, vec![0, 2, 1]);
    assert_eq!(app.preview.photo, Some(0));
    assert_eq!(app.tree.leaf_count(), app.store.len());

    let cmds = drain(&rx);
    assert_eq!(centers(&cmds), vec![0]);
    assert!(!cmds.iter().any(|c| matches!(c, MapCommand::LoadMarkers(_))));

    let paths_after: Vec<PathBuf> = app.store.records().iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths_before, paths_after);
}

#[test]
fn opening_empty_directory_keeps_store_and_shows_notice() {
    let (mut app, rx) = app_with_channel(sample_store(Path::new("/opt/photomap")));
    drain(&rx);
    let dir = tempfile::tempdir().unwrap();

    let result = app.open_directory(dir.path(), &LibrarySettings::default(), &NoMetadata);
    assert!(result.is_err());
    assert_eq!(app.store.len(), 3);
    assert_eq!(app.store.root(), Path::new("/opt/photomap"));
    assert!(drain(&rx).is_empty());

    let status = app.active_status(Instant::now()).unwrap();
    assert!(status.starts_with("No supported images found"), "{status}");
}

#[test]
fn opening_a_photo_directory_replaces_store_and_feed() {
    let (mut app, rx) = app_with_channel(sample_store(Path::new("/opt/photomap")));
    drain(&rx);

    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    std::fs::create_dir_all(a.join("b")).unwrap();
    std::fs::write(a.join("x.jpg"), b"x").unwrap();
    std::fs::write(a.join("b").join("y.png"), b"y").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"n").unwrap();

    let count = app
        .open_directory(dir.path(), &LibrarySettings::default(), &NoMetadata)
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(app.store.len(), 2);
    assert_eq!(app.tree.leaf_count(), 2);
    assert!(app.preview.photo.is_some());

    let cmds = drain(&rx);
    assert!(matches!(&cmds[0], MapCommand::LoadMarkers(m) if m.len() == 2));
    assert_eq!(centers(&cmds).len(), 1);

    let status = app.active_status(Instant::now()).unwrap();
    assert!(status.starts_with("Loaded 2 photos from '"), "{status}");
}

#[test]
fn status_messages_expire() {
    let (mut app, _rx) = app_with_channel(store());
    app.set_status_ttl(Duration::from_millis(100));
    app.set_status("hello");

    let now = Instant::now();
    assert_eq!(app.active_status(now), Some("hello"));
    assert_eq!(app.active_status(now + Duration::from_secs(1)), None);
}

#[test]
fn cursor_movement_selects_rows_and_skips_duplicates() {
    let (mut app, rx) = app_with_channel(store());
    drain(&rx);

    app.first();
    // Row 0 is the root group.
    assert_eq!(app.cursor, 0);
    assert_eq!(app.preview.photo, None);
    assert!(drain(&rx).is_empty());

    app.last();
    let last = app.rows.len() - 1;
    assert_eq!(app.cursor, last);
    let cmds = drain(&rx);
    assert_eq!(cmds.len(), 1);

    // Already at the bottom: nothing new is sent.
    app.next();
    assert_eq!(app.cursor, last);
    assert!(drain(&rx).is_empty());

    app.prev();
    assert_eq!(app.cursor, last - 1);
}

#[test]
fn activate_toggles_groups_and_recenters_leaves() {
    let (mut app, rx) = app_with_channel(store());
    drain(&rx);
    let total_rows = app.rows.len();

    let a = app.tree.child_by_label(PhotoTree::ROOT, "a").unwrap();
    let pos = app.rows.iter().position(|r| r.id == a).unwrap();
    app.cursor = pos;
    app.activate();
    assert!(app.is_collapsed(a));
    assert!(app.rows.len() < total_rows);
    assert_eq!(app.rows[app.cursor].id, a);

    app.activate();
    assert!(!app.is_collapsed(a));
    assert_eq!(app.rows.len(), total_rows);

    let leaf = app.tree.find_leaf(0).unwrap();
    app.cursor = app.rows.iter().position(|r| r.id == leaf).unwrap();
    app.activate();
    assert_eq!(drain(&rx), vec![MapCommand::CenterOn(0)]);
}

#[test]
fn collapse_or_parent_walks_up_the_tree() {
    let (mut app, rx) = app_with_channel(store());
    drain(&rx);

    let a = app.tree.child_by_label(PhotoTree::ROOT, "a").unwrap();
    let late = app.tree.find_leaf(0).unwrap();
    app.cursor = app.rows.iter().position(|r| r.id == late).unwrap();

    app.collapse_or_parent();
    assert_eq!(app.rows[app.cursor].id, a);
    assert_eq!(app.selected, Some(a));

    app.collapse_or_parent();
    assert!(app.is_collapsed(a));

    app.collapse_or_parent();
    assert_eq!(app.rows[app.cursor].id, PhotoTree::ROOT);
}

#[test]
fn open_prompt_prefills_root_and_ignores_blank_input() {
    let (mut app, _rx) = app_with_channel(store());
    app.enter_open_prompt();
    assert_eq!(app.input_mode, InputMode::OpenPrompt);
    assert_eq!(app.prompt, "/r");

    app.pop_prompt_char();
    app.pop_prompt_char();
    app.push_prompt_char(' ');
    assert!(
        app.submit_open_prompt(&LibrarySettings::default(), &NoMetadata)
            .is_none()
    );
    assert_eq!(app.input_mode, InputMode::Browse);
    assert!(app.prompt.is_empty());
    assert_eq!(app.store.len(), 3);
}
