use std::fs;
use std::path::{Path, PathBuf};

use super::feed::{MapMarker, feed_json};
use super::surface::{MapError, MapSurface};

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>photomap</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <style>
    html, body, #map { margin: 0; padding: 0; width: 100%; height: 100%; background: #0f131b; }
    .leaflet-container { background: #0f131b; color: #e9ecf2; }
    .popup-img { max-width: 220px; border-radius: 8px; margin-top: 6px; }
    .leaflet-popup-content { color: #e9ecf2; }
    .leaflet-popup-content-wrapper { background: #161c26; color: #e9ecf2; border: 1px solid #2a3242; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <script>
    const map = L.map('map', { worldCopyJump: true }).setView([20, 0], 2);
    L.tileLayer('__TILE_URL__', {
      maxZoom: 19,
      attribution: '&copy; OpenStreetMap'
    }).addTo(map);

    const markersData = __MARKERS__;
    const focusId = __FOCUS__;
    const focusZoom = __FOCUS_ZOOM__;
    const markers = [];

    const escapeHtml = s => String(s)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    markersData.forEach(m => {
      const popupHtml = `<b>${escapeHtml(m.title || 'Photo')}</b><br>${escapeHtml(m.subtitle || '')}` +
        (m.image ? `<br><img class="popup-img" src="${m.image}" />` : '');
      const marker = L.marker([m.lat || 0, m.lng || 0]).addTo(map).bindPopup(popupHtml);
      marker.photoId = m.id;
      markers.push(marker);
    });

    window.centerOn = function(id) {
      const marker = markers.find(m => m.photoId === id);
      if (!marker) return;
      map.setView(marker.getLatLng(), Math.max(map.getZoom(), focusZoom));
      marker.openPopup();
    };

    if (focusId !== null) {
      window.centerOn(focusId);
    }
  </script>
</body>
</html>
"#;

/// Writes a self-contained Leaflet page to disk.
///
/// Every command rewrites the page; reloading it in a browser shows the
/// current markers and, after `center_on`, the focused marker's popup.
#[derive(Debug)]
pub struct HtmlMapSurface {
    output: PathBuf,
    tile_url: String,
    focus_zoom: u8,
    markers: Vec<MapMarker>,
    focus: Option<usize>,
}

impl HtmlMapSurface {
    pub fn new(output: PathBuf, tile_url: String, focus_zoom: u8) -> Self {
        Self {
            output,
            tile_url,
            focus_zoom,
            markers: Vec::new(),
            focus: None,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Render the page for the current markers and focus.
    pub fn render(&self) -> Result<String, MapError> {
        let focus = self
            .focus
            .map(|id| id.to_string())
            .unwrap_or_else(|| "null".to_string());
        // `</` inside the JSON would end the script element early.
        let markers = feed_json(&self.markers)?.replace("</", "<\\/");
        Ok(PAGE_TEMPLATE
            .replace("__TILE_URL__", &self.tile_url.replace('\'', "%27"))
            .replace("__FOCUS_ZOOM__", &self.focus_zoom.to_string())
            .replace("__FOCUS__", &focus)
            .replace("__MARKERS__", &markers))
    }

    fn write(&self) -> Result<(), MapError> {
        let page = self.render()?;
        let io_err = |source| MapError::Io {
            path: self.output.clone(),
            source,
        };
        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        fs::write(&self.output, page).map_err(io_err)
    }
}

impl MapSurface for HtmlMapSurface {
    fn load_markers(&mut self, markers: &[MapMarker]) -> Result<(), MapError> {
        self.markers = markers.to_vec();
        self.focus = None;
        self.write()
    }

    fn center_on(&mut self, id: usize) -> Result<(), MapError> {
        if !self.markers.iter().any(|m| m.id == id) {
            return Ok(());
        }
        self.focus = Some(id);
        self.write()
    }
}
