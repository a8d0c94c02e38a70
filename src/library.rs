//! Photo library: the record store, directory scanning and sort orders.
//!
//! `scan` walks a directory and produces a fresh `PhotoStore`; the store is
//! never mutated afterwards, only replaced. `sorted_indices` projects an
//! ordering over a store without touching it.

mod model;
mod placeholder;
mod sample;
mod scan;
mod sort;

pub use model::*;
pub use sample::sample_store;
pub use scan::{ScanError, scan};
pub use sort::{SortMode, sorted_indices};
