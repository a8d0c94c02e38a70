use super::*;
use crate::library::{CoordsSource, PhotoRecord, PhotoStore, sample_store};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

fn rec(path: PathBuf, location: &str) -> PhotoRecord {
    PhotoRecord {
        path,
        latitude: 12.5,
        longitude: -7.25,
        timestamp: NaiveDateTime::parse_from_str("2022-07-03 12:05:59", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
        location_name: location.to_string(),
        coords_source: CoordsSource::Metadata,
    }
}

#[derive(Clone, Default)]
struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl MapSurface for Recorder {
    fn load_markers(&mut self, markers: &[MapMarker]) -> Result<(), MapError> {
        self.log.lock().unwrap().push(format!("load {}", markers.len()));
        Ok(())
    }

    fn center_on(&mut self, id: usize) -> Result<(), MapError> {
        self.log.lock().unwrap().push(format!("center {id}"));
        Ok(())
    }
}

#[test]
fn feed_has_one_marker_per_record_with_matching_ids() {
    let store = sample_store(Path::new("/nonexistent/photomap"));
    let feed = build_feed(&store);
    assert_eq!(feed.len(), store.len());

    let ids: Vec<usize> = feed.iter().map(|m| m.id).collect();
    assert_eq!(ids, (0..store.len()).collect::<Vec<_>>());

    for m in &feed {
        let r = store.get(m.id).unwrap();
        assert_eq!((m.lat, m.lng), (r.latitude, r.longitude));
        assert_eq!(m.title, r.location_name);
        assert_eq!(m.image, None);
    }
    assert_eq!(feed[0].subtitle, "2024-05-10 14:30");
}

#[test]
fn feed_title_falls_back_and_image_requires_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let real = dir.path().join("my photo.jpg");
    std::fs::write(&real, b"x").unwrap();
    let store = PhotoStore::new(
        dir.path().to_path_buf(),
        vec![rec(real.clone(), ""), rec(dir.path().join("gone.jpg"), "Lisbon")],
    );

    let feed = build_feed(&store);
    assert_eq!(feed[0].title, "my photo.jpg");
    assert_eq!(feed[0].subtitle, "2022-07-03 12:05");
    assert_eq!(feed[0].image.as_deref(), Some(file_uri(&real).as_str()));
    assert!(feed[0].image.as_deref().unwrap().ends_with("/my%20photo.jpg"));
    assert_eq!(feed[1].title, "Lisbon");
    assert_eq!(feed[1].image, None);
}

#[test]
fn feed_json_uses_renderer_field_names_and_omits_missing_images() {
    let markers = vec![
        MapMarker {
            id: 0,
            lat: 1.5,
            lng: 2.0,
            title: "A".into(),
            subtitle: "2024-01-01 00:00".into(),
            image: None,
        },
        MapMarker {
            id: 1,
            lat: -3.0,
            lng: 4.25,
            title: "B".into(),
            subtitle: "2024-01-02 00:00".into(),
            image: Some("file:///b.jpg".into()),
        },
    ];
    let json = feed_json(&markers).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value[0]["id"], 0);
    assert_eq!(value[0]["lat"], 1.5);
    assert_eq!(value[0]["title"], "A");
    assert!(value[0].get("image").is_none());
    assert_eq!(value[1]["image"], "file:///b.jpg");
    assert_eq!(value[1]["lng"], 4.25);
}

#[test]
fn file_uri_escapes_reserved_characters() {
    assert_eq!(file_uri(Path::new("/a/b.jpg")), "file:///a/b.jpg");
    assert_eq!(file_uri(Path::new("/a b/#1%.jpg")), "file:///a%20b/%231%25.jpg");
    assert_eq!(file_uri(Path::new("rel/x.png")), "file:///rel/x.png");
}

#[test]
fn html_surface_writes_markers_and_focus() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("map.html");
    let mut surface = HtmlMapSurface::new(out.clone(), "https://tiles/{z}/{x}/{y}.png".into(), 7);

    let store = sample_store(Path::new("/nonexistent"));
    surface.load_markers(&build_feed(&store)).unwrap();
    let page = std::fs::read_to_string(&out).unwrap();
    assert!(page.contains("\"title\":\"Moscow\""));
    assert!(page.contains("const focusId = null;"));
    assert!(page.contains("const focusZoom = 7;"));
    assert!(page.contains("https://tiles/{z}/{x}/{y}.png"));

    surface.center_on(2).unwrap();
    let page = std::fs::read_to_string(&out).unwrap();
    assert!(page.contains("const focusId = 2;"));

    // Unknown ids leave the page alone.
    surface.center_on(99).unwrap();
    let page = std::fs::read_to_string(surface.output()).unwrap();
    assert!(page.contains("const focusId = 2;"));
}

#[test]
fn html_surface_escapes_script_terminators_in_titles() {
    let dir = tempfile::tempdir().unwrap();
    let mut surface = HtmlMapSurface::new(dir.path().join("map.html"), "t".into(), 5);
    surface
        .load_markers(&[MapMarker {
            id: 0,
            lat: 0.0,
            lng: 0.0,
            title: "</script><b>".into(),
            subtitle: String::new(),
            image: None,
        }])
        .unwrap();
    let page = surface.render().unwrap();
    assert!(!page.contains("</script><b>"));
    assert!(page.contains("<\\/script><b>"));
}

#[test]
fn html_surface_escapes_popup_text_before_binding() {
    let dir = tempfile::tempdir().unwrap();
    let mut surface = HtmlMapSurface::new(dir.path().join("map.html"), "t".into(), 5);
    surface
        .load_markers(&[MapMarker {
            id: 0,
            lat: 0.0,
            lng: 0.0,
            title: "<img src=x onerror=alert(1)>".into(),
            subtitle: "a & b".into(),
            image: None,
        }])
        .unwrap();
    let page = surface.render().unwrap();

    assert!(page.contains(".replace(/&/g, '&amp;')"));
    assert!(page.contains(".replace(/</g, '&lt;')"));
    assert!(page.contains(".replace(/>/g, '&gt;')"));
    assert!(page.contains("${escapeHtml(m.title || 'Photo')}"));
    assert!(page.contains("${escapeHtml(m.subtitle || '')}"));
    // Marker text reaches the page only as JSON data, never as markup.
    assert!(!page.contains("<b><img"));
    assert!(page.contains("\"title\":\"<img src=x onerror=alert(1)>\""));
}

#[test]
fn map_handle_forwards_commands_in_order_until_shutdown() {
    let recorder = Recorder::default();
    let log = recorder.log.clone();

    let handle = MapHandle::spawn(Box::new(recorder));
    let tx = handle.sender();
    tx.send(MapCommand::LoadMarkers(vec![])).unwrap();
    tx.send(MapCommand::CenterOn(3)).unwrap();
    handle.send(MapCommand::CenterOn(1)).unwrap();
    handle.shutdown();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["load 0".to_string(), "center 3".into(), "center 1".into()]
    );
    // Worker is gone; further sends fail instead of blocking.
    assert!(handle.send(MapCommand::CenterOn(0)).is_err());
}

#[test]
fn null_surface_accepts_everything() {
    let mut s = NullSurface;
    assert!(s.load_markers(&[]).is_ok());
    assert!(s.center_on(42).is_ok());
}
