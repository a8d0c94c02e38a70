//! Folder tree projection of the photo store.
//!
//! The tree is rebuilt from scratch whenever the store or the sort order
//! changes; `build_tree` owns the prefix cache for the duration of one build.

mod build;
mod model;

pub use build::{build_tree, relative_segments};
pub use model::*;
