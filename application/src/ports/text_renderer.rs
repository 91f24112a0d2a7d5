//! Text renderer port
//!
//! Glyph lookup and line shaping live behind this interface; the core only
//! passes a caller-supplied font identifier through.

use glyphcast_domain::{ArtBlock, FontId};

/// Renders one input line into a block of art text.
///
/// Total for any line and any font identifier: unknown faces fall back to
/// the adapter's default, unknown characters render as blank cells.
pub trait TextRenderer: Send + Sync {
    fn render(&self, line: &str, font: &FontId) -> ArtBlock;
}
