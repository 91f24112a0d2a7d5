//! Built-in block-letter renderer
//!
//! A fixed-height glyph table covering letters, digits, and common
//! punctuation. Unknown characters render as a blank cell of the same
//! height; face identifiers outside the built-in set fall back to the
//! default face, so rendering is total for any input.

use glyphcast_application::ports::text_renderer::TextRenderer;
use glyphcast_domain::{ArtBlock, FontId};

/// Rows per glyph.
pub const FONT_HEIGHT: usize = 5;

/// Face names this renderer knows.
pub const FACES: &[&str] = &["standard"];

const BLANK: [&str; FONT_HEIGHT] = ["   ", "   ", "   ", "   ", "   "];

pub struct BlockFontRenderer;

impl BlockFontRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Whether `face` names a built-in face (anything else falls back).
    pub fn knows_face(face: &FontId) -> bool {
        FACES.contains(&face.as_str())
    }
}

impl Default for BlockFontRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer for BlockFontRenderer {
    fn render(&self, line: &str, _font: &FontId) -> ArtBlock {
        let mut rows = vec![String::new(); FONT_HEIGHT];
        for (i, c) in line.chars().enumerate() {
            let cell = glyph(c).unwrap_or(BLANK);
            for (row, piece) in rows.iter_mut().zip(cell) {
                if i > 0 {
                    row.push(' ');
                }
                row.push_str(piece);
            }
        }
        ArtBlock::new(rows)
    }
}

#[rustfmt::skip]
fn glyph(c: char) -> Option<[&'static str; FONT_HEIGHT]> {
    let g = match c.to_ascii_uppercase() {
        'A' => [" ### ", "#   #", "#####", "#   #", "#   #"],
        'B' => ["#### ", "#   #", "#### ", "#   #", "#### "],
        'C' => [" ####", "#    ", "#    ", "#    ", " ####"],
        'D' => ["#### ", "#   #", "#   #", "#   #", "#### "],
        'E' => ["#####", "#    ", "#### ", "#    ", "#####"],
        'F' => ["#####", "#    ", "#### ", "#    ", "#    "],
        'G' => [" ####", "#    ", "#  ##", "#   #", " ####"],
        'H' => ["#   #", "#   #", "#####", "#   #", "#   #"],
        'I' => ["#####", "  #  ", "  #  ", "  #  ", "#####"],
        'J' => ["#####", "   # ", "   # ", "#  # ", " ##  "],
        'K' => ["#   #", "#  # ", "###  ", "#  # ", "#   #"],
        'L' => ["#    ", "#    ", "#    ", "#    ", "#####"],
        'M' => ["#   #", "## ##", "# # #", "#   #", "#   #"],
        'N' => ["#   #", "##  #", "# # #", "#  ##", "#   #"],
        'O' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        'P' => ["#### ", "#   #", "#### ", "#    ", "#    "],
        'Q' => [" ### ", "#   #", "#   #", "#  # ", " ## #"],
        'R' => ["#### ", "#   #", "#### ", "#  # ", "#   #"],
        'S' => [" ####", "#    ", " ### ", "    #", "#### "],
        'T' => ["#####", "  #  ", "  #  ", "  #  ", "  #  "],
        'U' => ["#   #", "#   #", "#   #", "#   #", " ### "],
        'V' => ["#   #", "#   #", "#   #", " # # ", "  #  "],
        'W' => ["#   #", "#   #", "# # #", "## ##", "#   #"],
        'X' => ["#   #", " # # ", "  #  ", " # # ", "#   #"],
        'Y' => ["#   #", " # # ", "  #  ", "  #  ", "  #  "],
        'Z' => ["#####", "   # ", "  #  ", " #   ", "#####"],
        '0' => [" ### ", "#  ##", "# # #", "##  #", " ### "],
        '1' => ["  #  ", " ##  ", "  #  ", "  #  ", "#####"],
        '2' => [" ### ", "#   #", "  ## ", " #   ", "#####"],
        '3' => ["#### ", "    #", " ### ", "    #", "#### "],
        '4' => ["#  # ", "#  # ", "#####", "   # ", "   # "],
        '5' => ["#####", "#    ", "#### ", "    #", "#### "],
        '6' => [" ### ", "#    ", "#### ", "#   #", " ### "],
        '7' => ["#####", "   # ", "  #  ", " #   ", "#    "],
        '8' => [" ### ", "#   #", " ### ", "#   #", " ### "],
        '9' => [" ### ", "#   #", " ####", "    #", " ### "],
        '.' => ["  ", "  ", "  ", "  ", "# "],
        ',' => ["  ", "  ", "  ", " #", "# "],
        '!' => ["#", "#", "#", " ", "#"],
        '?' => [" ### ", "#   #", "  ## ", "     ", "  #  "],
        '-' => ["    ", "    ", "####", "    ", "    "],
        ':' => [" ", "#", " ", "#", " "],
        '\'' => ["#", "#", " ", " ", " "],
        _ => return None,
    };
    Some(g)
}
