//! Animated GIF export
//!
//! Rasterizes each frame without any font machinery: every non-blank glyph
//! cell becomes a filled pixel square. The shadow layer is drawn first at a
//! small fixed offset, then the foreground over it, which is the same
//! layering the live display uses. Frame delay and loop mode pass through
//! to the encoder unchanged.

use glyphcast_application::ports::frame_exporter::{ExportError, FrameExporter};
use glyphcast_domain::{AnimationFrame, ArtBlock, ArtworkDocument, Rgb};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Pixels per glyph cell.
const CELL: u32 = 8;
/// Border around the art, in pixels.
const MARGIN: u32 = 10;
/// Shadow layer offset, in pixels.
const SHADOW_OFFSET: (u32, u32) = (2, 2);

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

pub struct GifFrameExporter;

impl GifFrameExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GifFrameExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameExporter for GifFrameExporter {
    fn export(
        &self,
        document: &ArtworkDocument,
        frames: &[AnimationFrame],
        frame_delay: Duration,
        path: &Path,
    ) -> Result<(), ExportError> {
        let (cols, rows) = document.extent();
        if cols == 0 || rows == 0 || frames.is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let width = cols as u32 * CELL + 2 * MARGIN + SHADOW_OFFSET.0;
        let height = rows as u32 * CELL + 2 * MARGIN + SHADOW_OFFSET.1;

        let file = File::create(path)?;
        let mut encoder = GifEncoder::new(file);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| ExportError::Encoding(e.to_string()))?;

        let delay = Delay::from_saturating_duration(frame_delay);
        for frame in frames {
            let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
            draw_layer(
                &mut canvas,
                document.blocks(),
                (MARGIN + SHADOW_OFFSET.0, MARGIN + SHADOW_OFFSET.1),
                frame.shadow,
            );
            draw_layer(&mut canvas, document.blocks(), (MARGIN, MARGIN), document.foreground());
            encoder
                .encode_frame(Frame::from_parts(canvas, 0, 0, delay))
                .map_err(|e| ExportError::Encoding(e.to_string()))?;
        }

        debug!(
            frames = frames.len(),
            width, height,
            path = %path.display(),
            "animated export written"
        );
        Ok(())
    }
}

fn draw_layer(canvas: &mut RgbaImage, blocks: &[ArtBlock], origin: (u32, u32), color: Rgb) {
    let pixel = Rgba([color.r, color.g, color.b, 255]);
    let mut row_base = 0u32;
    for block in blocks {
        for (row, line) in block.lines().iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                if c == ' ' {
                    continue;
                }
                let x0 = origin.0 + col as u32 * CELL;
                let y0 = origin.1 + (row_base + row as u32) * CELL;
                for dy in 0..CELL {
                    for dx in 0..CELL {
                        canvas.put_pixel(x0 + dx, y0 + dy, pixel);
                    }
                }
            }
        }
        row_base += block.height() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphcast_domain::export_frames;
    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use std::io::BufReader;

    fn sample_document() -> ArtworkDocument {
        ArtworkDocument::new(
            vec![ArtBlock::new(vec![
                "## ##".to_string(),
                " ### ".to_string(),
            ])],
            Rgb::from_hex("#3B82F6").unwrap(),
            Rgb::from_hex("#1E40AF").unwrap(),
        )
    }

    #[test]
    fn writes_a_looped_gif_with_one_frame_per_cycle_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.gif");
        let doc = sample_document();
        let frames = export_frames(doc.shadow());

        GifFrameExporter::new()
            .export(&doc, &frames, Duration::from_millis(400), &path)
            .unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 4);
    }

    #[test]
    fn unchanged_state_exports_byte_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.gif");
        let second = dir.path().join("b.gif");
        let doc = sample_document();
        let frames = export_frames(doc.shadow());
        let exporter = GifFrameExporter::new();

        exporter
            .export(&doc, &frames, Duration::from_millis(400), &first)
            .unwrap();
        exporter
            .export(&doc, &frames, Duration::from_millis(400), &second)
            .unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn empty_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let doc = ArtworkDocument::new(vec![], Rgb::new(0, 0, 0), Rgb::new(1, 1, 1));
        let frames = export_frames(doc.shadow());
        let result = GifFrameExporter::new().export(
            &doc,
            &frames,
            Duration::from_millis(400),
            &dir.path().join("empty.gif"),
        );
        assert!(matches!(result, Err(ExportError::EmptyDocument)));
    }
}
