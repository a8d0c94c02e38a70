use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Smallest thumbnail ever produced.
pub const MIN_WIDTH: u32 = 64;
pub const MIN_HEIGHT: u32 = 48;

const GRADIENT_FROM: [u8; 3] = [30, 36, 48];
const GRADIENT_TO: [u8; 3] = [18, 22, 30];
const BORDER: [u8; 3] = [59, 169, 255];
const BORDER_INSET: u32 = 2;
const BORDER_WIDTH: u32 = 2;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("'{}' does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("cannot decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Image decoding service: a scaled bitmap for a file, or an error.
pub trait ThumbnailSource {
    /// Bitmap fitting inside `width`×`height`, aspect ratio preserved.
    fn thumbnail(&self, path: &Path, width: u32, height: u32) -> Result<RgbaImage, ThumbnailError>;
}

/// Decodes with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageThumbnails;

impl ThumbnailSource for ImageThumbnails {
    fn thumbnail(&self, path: &Path, width: u32, height: u32) -> Result<RgbaImage, ThumbnailError> {
        if !path.is_file() {
            return Err(ThumbnailError::Missing {
                path: path.to_path_buf(),
            });
        }
        let img = image::open(path).map_err(|source| ThumbnailError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(img.thumbnail(width, height).to_rgba8())
    }
}

/// Raise a requested size to the `MIN_WIDTH`×`MIN_HEIGHT` floor.
pub fn clamp_target(width: u32, height: u32) -> (u32, u32) {
    (width.max(MIN_WIDTH), height.max(MIN_HEIGHT))
}

fn lerp(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}

/// Dark diagonal gradient inside an accent frame.
pub fn placeholder_image(width: u32, height: u32) -> RgbaImage {
    let (width, height) = clamp_target(width, height);
    let span = (width + height - 2) as f32;

    RgbaImage::from_fn(width, height, |x, y| {
        let t = (x + y) as f32 / span;
        let in_frame = |v: u32, max: u32| {
            (BORDER_INSET..BORDER_INSET + BORDER_WIDTH).contains(&v)
                || (max - BORDER_INSET - BORDER_WIDTH..max - BORDER_INSET).contains(&v)
        };
        let inside_x = (BORDER_INSET..width - BORDER_INSET).contains(&x);
        let inside_y = (BORDER_INSET..height - BORDER_INSET).contains(&y);
        let on_border = (inside_x && in_frame(y, height)) || (inside_y && in_frame(x, width));

        if on_border {
            Rgba([BORDER[0], BORDER[1], BORDER[2], 255])
        } else {
            Rgba([
                lerp(GRADIENT_FROM[0], GRADIENT_TO[0], t),
                lerp(GRADIENT_FROM[1], GRADIENT_TO[1], t),
                lerp(GRADIENT_FROM[2], GRADIENT_TO[2], t),
                255,
            ])
        }
    })
}
