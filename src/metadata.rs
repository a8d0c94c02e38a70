//! Photo metadata lookup.
//!
//! The scanner asks a `MetadataSource` for GPS coordinates and capture time.
//! Missing or unreadable metadata is not an error: the record simply keeps
//! its file timestamp and falls back to placeholder coordinates.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Tag, Value};

/// What a metadata source could tell about one file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhotoMetadata {
    /// `(latitude, longitude)` in decimal degrees.
    pub coordinates: Option<(f64, f64)>,
    pub captured_at: Option<NaiveDateTime>,
}

pub trait MetadataSource {
    fn read(&self, path: &Path) -> PhotoMetadata;
}

/// Source that never knows anything; used when EXIF reading is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMetadata;

impl MetadataSource for NoMetadata {
    fn read(&self, _path: &Path) -> PhotoMetadata {
        PhotoMetadata::default()
    }
}

/// Reads GPS and `DateTimeOriginal` tags with `kamadak-exif`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifMetadata;

impl MetadataSource for ExifMetadata {
    fn read(&self, path: &Path) -> PhotoMetadata {
        let Some(exif) = read_exif(path) else {
            return PhotoMetadata::default();
        };
        PhotoMetadata {
            coordinates: gps_coordinates(&exif),
            captured_at: capture_time(&exif),
        }
    }
}

fn read_exif(path: &Path) -> Option<exif::Exif> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    exif::Reader::new().read_from_container(&mut reader).ok()
}

/// Extract `(latitude, longitude)`, applying the N/S and E/W reference tags.
fn gps_coordinates(exif: &exif::Exif) -> Option<(f64, f64)> {
    let lat = dms_to_degrees(&exif.get_field(Tag::GPSLatitude, In::PRIMARY)?.value)?;
    let lng = dms_to_degrees(&exif.get_field(Tag::GPSLongitude, In::PRIMARY)?.value)?;

    let lat = if reference_is(exif, Tag::GPSLatitudeRef, "S") { -lat } else { lat };
    let lng = if reference_is(exif, Tag::GPSLongitudeRef, "W") { -lng } else { lng };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some((lat, lng))
}

fn reference_is(exif: &exif::Exif, tag: Tag, expected: &str) -> bool {
    exif.get_field(tag, In::PRIMARY)
        .map(|f| f.value.display_as(tag).to_string())
        .is_some_and(|r| r.trim().eq_ignore_ascii_case(expected))
}

/// Degrees/minutes/seconds rationals to a positive decimal magnitude.
fn dms_to_degrees(value: &Value) -> Option<f64> {
    let Value::Rational(parts) = value else {
        return None;
    };
    if parts.len() < 3 || parts.iter().take(3).any(|r| r.denom == 0) {
        return None;
    }
    Some(parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0)
}

fn capture_time(exif: &exif::Exif) -> Option<NaiveDateTime> {
    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    let Value::Ascii(ref lines) = field.value else {
        return None;
    };
    let dt = exif::DateTime::from_ascii(lines.first()?).ok()?;
    NaiveDate::from_ymd_opt(dt.year.into(), dt.month.into(), dt.day.into())?.and_hms_opt(
        dt.hour.into(),
        dt.minute.into(),
        dt.second.into(),
    )
}
