//! Rendered artwork entities

use crate::core::color::Rgb;

/// A font face identifier, passed through to the renderer unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontId(String);

impl FontId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FontId {
    fn default() -> Self {
        Self("standard".to_string())
    }
}

impl std::fmt::Display for FontId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rendered, multi-line textual representation of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtBlock {
    lines: Vec<String>,
}

impl ArtBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of rows in this block.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Width of the widest row, in character cells.
    pub fn width(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }
}

/// The currently displayed artwork: rendered blocks plus the two active
/// colors.
///
/// Mutated only by explicit user actions (generate, recolor); the live
/// animator changes the *displayed* shadow shade, never this document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkDocument {
    blocks: Vec<ArtBlock>,
    foreground: Rgb,
    shadow: Rgb,
}

impl ArtworkDocument {
    pub fn new(blocks: Vec<ArtBlock>, foreground: Rgb, shadow: Rgb) -> Self {
        Self {
            blocks,
            foreground,
            shadow,
        }
    }

    pub fn blocks(&self) -> &[ArtBlock] {
        &self.blocks
    }

    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    pub fn shadow(&self) -> Rgb {
        self.shadow
    }

    /// Replace both colors, keeping the rendered text.
    pub fn recolor(&mut self, foreground: Rgb, shadow: Rgb) {
        self.foreground = foreground;
        self.shadow = shadow;
    }

    /// The art as plain text, blocks stacked in order. This is what the
    /// copy action puts on the clipboard.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            for line in block.lines() {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Total extent in character cells: (columns, rows).
    pub fn extent(&self) -> (usize, usize) {
        let cols = self.blocks.iter().map(ArtBlock::width).max().unwrap_or(0);
        let rows = self.blocks.iter().map(ArtBlock::height).sum();
        (cols, rows)
    }
}
