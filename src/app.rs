//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the current photo store,
//! its projections, the selection and the preview.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
