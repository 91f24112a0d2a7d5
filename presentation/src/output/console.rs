//! Truecolor console rendering of an artwork document
//!
//! Emulates the layered display: the shadow copy of the art sits one cell
//! down-right of the foreground copy, and the foreground wins where the
//! two overlap. The shadow is drawn in the *displayed* shade — the live
//! animator changes that shade, never the document.

use colored::Colorize;
use glyphcast_domain::{ArtworkDocument, Rgb};

/// Which layer owns a composed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Foreground,
    Shadow,
}

/// Offset of the shadow layer, in character cells.
const OFFSET: (usize, usize) = (1, 1);

pub struct ConsoleArt;

impl ConsoleArt {
    /// Render the document with its shadow in `displayed_shadow`.
    pub fn render(document: &ArtworkDocument, displayed_shadow: Rgb) -> String {
        let fg = document.foreground();
        let grid = compose(document);

        let mut out = String::new();
        for row in grid {
            for cell in row {
                match cell {
                    Some((c, Layer::Foreground)) => {
                        out.push_str(&c.to_string().truecolor(fg.r, fg.g, fg.b).to_string());
                    }
                    Some((c, Layer::Shadow)) => {
                        out.push_str(
                            &c.to_string()
                                .truecolor(
                                    displayed_shadow.r,
                                    displayed_shadow.g,
                                    displayed_shadow.b,
                                )
                                .to_string(),
                        );
                    }
                    None => out.push(' '),
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Compose both layers into one grid. Pure; colors are applied afterwards.
fn compose(document: &ArtworkDocument) -> Vec<Vec<Option<(char, Layer)>>> {
    let (cols, rows) = document.extent();
    if cols == 0 || rows == 0 {
        return Vec::new();
    }
    let mut grid = vec![vec![None; cols + OFFSET.0]; rows + OFFSET.1];

    // Shadow first, then foreground over it.
    stamp(&mut grid, document, OFFSET, Layer::Shadow);
    stamp(&mut grid, document, (0, 0), Layer::Foreground);
    grid
}

fn stamp(
    grid: &mut [Vec<Option<(char, Layer)>>],
    document: &ArtworkDocument,
    origin: (usize, usize),
    layer: Layer,
) {
    let mut row_base = 0;
    for block in document.blocks() {
        for (row, line) in block.lines().iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                if c == ' ' {
                    continue;
                }
                let cell = &mut grid[origin.1 + row_base + row][origin.0 + col];
                if layer == Layer::Foreground || cell.is_none() {
                    *cell = Some((c, layer));
                }
            }
        }
        row_base += block.height();
    }
}
