//! Art generation: input text to a colored ArtworkDocument

use crate::ports::text_renderer::TextRenderer;
use glyphcast_domain::{ArtworkDocument, DomainError, FontId, Rgb};
use std::sync::Arc;

/// Sample word rendered by the font preview action.
const PREVIEW_TEXT: &str = "Preview";

/// Renders input text into an artwork document through the renderer port.
pub struct GenerateArt<R: TextRenderer> {
    renderer: Arc<R>,
}

impl<R: TextRenderer> GenerateArt<R> {
    pub fn new(renderer: Arc<R>) -> Self {
        Self { renderer }
    }

    /// Render `text` (one block per input line) with the given colors.
    ///
    /// Empty or whitespace-only input is rejected before touching the
    /// renderer.
    pub fn generate(
        &self,
        text: &str,
        font: &FontId,
        foreground: Rgb,
        shadow: Rgb,
    ) -> Result<ArtworkDocument, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::EmptyInput);
        }
        let blocks = text
            .lines()
            .map(|line| self.renderer.render(line, font))
            .collect();
        Ok(ArtworkDocument::new(blocks, foreground, shadow))
    }

    /// Render the fixed preview sample in `font`.
    pub fn preview(&self, font: &FontId, foreground: Rgb, shadow: Rgb) -> ArtworkDocument {
        ArtworkDocument::new(
            vec![self.renderer.render(PREVIEW_TEXT, font)],
            foreground,
            shadow,
        )
    }
}
