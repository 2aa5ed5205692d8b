//! Interface to the map-drawing collaborator.
//!
//! Rendering the network is not this crate's job. The trait below is the
//! seam: an implementation receives the catalogue (whose `stops()` and
//! `buses()` views are name-ordered, so output is deterministic) together
//! with the opaque `render_settings` value, and produces the image
//! payload embedded in `Map` query answers.

use serde_json::Value;

use crate::catalogue::Catalogue;

/// Draws the network into a textual image payload (e.g. an SVG document).
pub trait MapRenderer {
    fn render(&self, catalogue: &Catalogue, settings: &Value) -> String;
}
