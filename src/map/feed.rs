use std::path::Path;

use serde::Serialize;

use crate::library::PhotoStore;

/// One marker as consumed by the map page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// Store index of the photo.
    pub id: usize,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub subtitle: String,
    /// `file://` URI, only when the file existed while the feed was built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Build the full marker list for `store`, one marker per record, in store order.
pub fn build_feed(store: &PhotoStore) -> Vec<MapMarker> {
    store
        .records()
        .iter()
        .enumerate()
        .map(|(id, r)| MapMarker {
            id,
            lat: r.latitude,
            lng: r.longitude,
            title: r.title(),
            subtitle: r.formatted_timestamp(),
            image: r.path.is_file().then(|| file_uri(&r.path)),
        })
        .collect()
}

/// Compact JSON array of markers.
pub fn feed_json(markers: &[MapMarker]) -> Result<String, serde_json::Error> {
    serde_json::to_string(markers)
}

/// `file://` URI for a local path, percent-encoding anything outside the
/// unreserved set.
pub fn file_uri(path: &Path) -> String {
    let mut s = path.to_string_lossy().replace('\\', "/");
    if !s.starts_with('/') {
        s = format!("/{s}");
    }

    let mut out = String::with_capacity(s.len() + 7);
    out.push_str("file://");
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' | b':' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
