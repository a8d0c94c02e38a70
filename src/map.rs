//! Map feed and the map rendering surface.
//!
//! The core never draws the map itself. It builds a marker feed from the
//! store and sends typed `MapCommand`s over a channel to a worker that owns
//! a pluggable `MapSurface`.

mod feed;
mod html;
mod surface;

pub use feed::{MapMarker, build_feed, feed_json, file_uri};
pub use html::HtmlMapSurface;
pub use surface::{MapCommand, MapError, MapHandle, MapSurface, NullSurface};

#[cfg(test)]
mod tests;
