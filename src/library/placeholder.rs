//! Fallback coordinates for photos without a known location.
//!
//! Unknown photos are spread along a sine wave around the globe instead of
//! stacking on (0, 0). The layout depends only on discovery order, so the
//! same scan always produces the same map.

use super::model::{CoordsSource, PhotoRecord};

/// Placeholder `(latitude, longitude)` for the photo discovered at `index`.
///
/// Longitude is in `[-180, 180)`, latitude in `[-80, 80]`.
pub fn placeholder_coords(index: usize) -> (f64, f64) {
    let i = index as f64;
    let longitude = (i * 42.0) % 360.0 - 180.0;
    let latitude = (60.0 * (i * 0.7).sin()).clamp(-80.0, 80.0);
    (latitude, longitude)
}

/// Replace unknown (0, 0) coordinates with the placeholder for `index`.
pub fn assign_if_missing(record: &mut PhotoRecord, index: usize) {
    if !record.has_unknown_coords() {
        return;
    }
    let (latitude, longitude) = placeholder_coords(index);
    record.latitude = latitude;
    record.longitude = longitude;
    record.coords_source = CoordsSource::Placeholder;
}
