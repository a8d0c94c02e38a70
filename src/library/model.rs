use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// `strftime` pattern used wherever a photo timestamp is shown.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Label used for the tree root when the scanned directory has no name.
pub const DEFAULT_ROOT_LABEL: &str = "Photos";

/// Where a record's coordinates came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordsSource {
    /// GPS tags read from the file.
    Metadata,
    /// Built-in sample data.
    Sample,
    /// Deterministic fallback layout, not a real location.
    Placeholder,
}

/// One photograph.
#[derive(Debug, Clone)]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub latitude: f64,
    pub longitude: f64,
    /// Capture time when known, else the file modification time.
    pub timestamp: NaiveDateTime,
    pub location_name: String,
    pub coords_source: CoordsSource,
}

impl PhotoRecord {
    /// Final path component, or an empty string.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Marker/list title: location name, then file name, then "Untitled".
    pub fn title(&self) -> String {
        if !self.location_name.is_empty() {
            return self.location_name.clone();
        }
        let name = self.file_name();
        if name.is_empty() {
            "Untitled".to_string()
        } else {
            name
        }
    }

    /// Both coordinates exactly zero means "unknown".
    pub fn has_unknown_coords(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Multi-line detail text shown for a highlighted leaf.
    pub fn details(&self) -> String {
        format!(
            "{}\n{}\nLat: {:.4}\nLng: {:.4}",
            self.title(),
            self.formatted_timestamp(),
            self.latitude,
            self.longitude
        )
    }
}

/// Ordered snapshot of the records found under one root directory.
///
/// Built in one go by a scan (or the sample loader) and then only read.
/// Loading another directory produces a new store that replaces this one.
#[derive(Debug, Clone, Default)]
pub struct PhotoStore {
    root: PathBuf,
    records: Vec<PhotoRecord>,
}

impl PhotoStore {
    pub fn new(root: PathBuf, records: Vec<PhotoRecord>) -> Self {
        Self { root, records }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&PhotoRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Name of the root directory, or `DEFAULT_ROOT_LABEL` for nameless roots such as `/`.
    pub fn root_label(&self) -> String {
        dir_label(&self.root)
    }
}

/// Display name of a directory, falling back to `DEFAULT_ROOT_LABEL`.
pub fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ROOT_LABEL.to_string())
}
