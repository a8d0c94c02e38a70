//! Preview pane model and the thumbnail service behind it.
//!
//! Decoding goes through a `ThumbnailSource`; any failure is recovered here
//! with a generated placeholder bitmap, so callers always get something to
//! draw.

mod thumbnail;

pub use thumbnail::{
    ImageThumbnails, MIN_HEIGHT, MIN_WIDTH, ThumbnailError, ThumbnailSource, clamp_target,
    placeholder_image,
};

use image::RgbaImage;

use crate::library::PhotoRecord;

/// Caption shown while nothing valid is selected.
pub const DEFAULT_CAPTION: &str = "Select a photo in the list to see its preview.";

/// A bitmap plus the text to draw over it when it is a placeholder.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub image: RgbaImage,
    /// Set when decoding failed and `image` is a placeholder.
    pub fallback_text: Option<String>,
}

/// Decode `path` at `width`×`height`, falling back to a placeholder that
/// carries `fallback_text` (or "No file" when that is empty).
pub fn load_thumbnail(
    source: &dyn ThumbnailSource,
    path: &std::path::Path,
    width: u32,
    height: u32,
    fallback_text: &str,
) -> Thumbnail {
    let (width, height) = clamp_target(width, height);
    match source.thumbnail(path, width, height) {
        Ok(image) => Thumbnail {
            image,
            fallback_text: None,
        },
        Err(e) => {
            tracing::debug!(error = %e, "using placeholder thumbnail");
            let text = if fallback_text.is_empty() {
                "No file"
            } else {
                fallback_text
            };
            Thumbnail {
                image: placeholder_image(width, height),
                fallback_text: Some(text.to_string()),
            }
        }
    }
}

/// Contents of the preview pane.
#[derive(Debug, Clone)]
pub struct Preview {
    /// Store index being previewed; `None` for the default placeholder.
    pub photo: Option<usize>,
    pub thumbnail: Thumbnail,
    pub caption: String,
}

impl Preview {
    /// The "nothing selected" preview.
    pub fn empty(width: u32, height: u32) -> Self {
        let (width, height) = clamp_target(width, height);
        Self {
            photo: None,
            thumbnail: Thumbnail {
                image: placeholder_image(width, height),
                fallback_text: Some("No photo".to_string()),
            },
            caption: DEFAULT_CAPTION.to_string(),
        }
    }

    /// Preview of `record`, stored at `index`.
    pub fn for_record(
        index: usize,
        record: &PhotoRecord,
        source: &dyn ThumbnailSource,
        width: u32,
        height: u32,
    ) -> Self {
        let name = display_name(record);
        Self {
            photo: Some(index),
            thumbnail: load_thumbnail(source, &record.path, width, height, &name),
            caption: caption_for(record),
        }
    }
}

fn display_name(record: &PhotoRecord) -> String {
    if record.location_name.is_empty() {
        "Untitled".to_string()
    } else {
        record.location_name.clone()
    }
}

/// Three caption lines: name, timestamp, coordinates.
pub fn caption_for(record: &PhotoRecord) -> String {
    format!(
        "{}\n{}\nLat: {:.4}, Lng: {:.4}",
        display_name(record),
        record.formatted_timestamp(),
        record.latitude,
        record.longitude
    )
}
