use std::cmp::Ordering;

use super::model::PhotoRecord;

/// Ordering applied to the photo list and tree.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Ascending timestamp; ties keep discovery order.
    #[default]
    ByTime,
    /// Location name, case-insensitive first, then exact text.
    ByLocation,
}

impl SortMode {
    /// Switch between the two modes.
    pub fn toggled(self) -> Self {
        match self {
            Self::ByTime => Self::ByLocation,
            Self::ByLocation => Self::ByTime,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ByTime => "by time",
            Self::ByLocation => "by location",
        }
    }
}

/// Collation used for location names.
///
/// Letters compare without regard to case first, so "berlin" sits next to
/// "Berlin" rather than after every capitalised name; exact text breaks the
/// remaining ties. Empty names sort before everything else.
pub fn compare_location(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Project an ordering of store indices without mutating `records`.
///
/// Both modes are stable: equal keys keep their discovery order.
pub fn sorted_indices(records: &[PhotoRecord], mode: SortMode) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..records.len()).collect();
    match mode {
        SortMode::ByTime => indices.sort_by_key(|&i| records[i].timestamp),
        SortMode::ByLocation => indices.sort_by(|&a, &b| {
            compare_location(&records[a].location_name, &records[b].location_name)
        }),
    }
    indices
}
