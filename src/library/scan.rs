use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::metadata::MetadataSource;

use super::model::{CoordsSource, PhotoRecord, PhotoStore};
use super::placeholder::assign_if_missing;

/// Why a scan produced no store. The previous store stays in place either way.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no supported images found in '{}'", path.display())]
    Empty { path: PathBuf },
    #[error("cannot read '{}': {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },
}

impl ScanError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Empty { path } | Self::Unreadable { path, .. } => path,
        }
    }
}

/// Return true when `path` has one of the configured photo extensions.
pub fn is_image_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn modified_time(entry: &walkdir::DirEntry) -> NaiveDateTime {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .map(|t| DateTime::<Local>::from(t).naive_local())
        .unwrap_or_default()
}

fn parent_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Walk `dir` and build a fresh store of every supported photo beneath it.
///
/// Records are appended in discovery order (file names sorted within each
/// directory) and that order seeds the placeholder coordinates. Nothing is
/// returned unless at least one photo was found.
pub fn scan(
    dir: &Path,
    settings: &LibrarySettings,
    metadata: &dyn MetadataSource,
) -> Result<PhotoStore, ScanError> {
    let unreadable = |source: io::Error| ScanError::Unreadable {
        path: dir.to_path_buf(),
        source,
    };
    let root = fs::canonicalize(dir).map_err(unreadable)?;
    fs::read_dir(&root).map_err(unreadable)?;

    let mut walker = WalkDir::new(&root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();
    if let Some(d) = settings.max_depth {
        walker = walker.max_depth(d);
    }

    let mut records: Vec<PhotoRecord> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image_file(path, settings) {
            continue;
        }

        let index = records.len();
        let found = metadata.read(path);

        let mut record = PhotoRecord {
            path: path.to_path_buf(),
            latitude: 0.0,
            longitude: 0.0,
            timestamp: found.captured_at.unwrap_or_else(|| modified_time(&entry)),
            location_name: parent_name(path),
            coords_source: CoordsSource::Metadata,
        };
        if let Some((lat, lng)) = found.coordinates {
            record.latitude = lat;
            record.longitude = lng;
        }
        assign_if_missing(&mut record, index);

        tracing::trace!(index, path = %path.display(), "photo discovered");
        records.push(record);
    }

    if records.is_empty() {
        return Err(ScanError::Empty {
            path: dir.to_path_buf(),
        });
    }

    tracing::info!(root = %root.display(), count = records.len(), "scan finished");
    Ok(PhotoStore::new(root, records))
}
