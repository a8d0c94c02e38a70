use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use super::model::{CoordsSource, PhotoRecord, PhotoStore};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

fn sample(base: &Path, file: &str, lat: f64, lng: f64, ts: NaiveDateTime, name: &str) -> PhotoRecord {
    PhotoRecord {
        path: base.join(file),
        latitude: lat,
        longitude: lng,
        timestamp: ts,
        location_name: name.to_string(),
        coords_source: CoordsSource::Sample,
    }
}

/// Three well-known places shown before any directory has been opened.
///
/// The files usually don't exist next to `base`; they render as placeholders.
pub fn sample_store(base: &Path) -> PhotoStore {
    let records = vec![
        sample(base, "sample1.jpg", 55.7558, 37.6173, at(2024, 5, 10, 14, 30), "Moscow"),
        sample(
            base,
            "sample2.jpg",
            59.9375,
            30.3086,
            at(2023, 8, 20, 18, 15),
            "Saint Petersburg",
        ),
        sample(base, "sample3.jpg", 48.8566, 2.3522, at(2022, 7, 3, 12, 5), "Paris"),
    ];
    PhotoStore::new(base.to_path_buf(), records)
}
