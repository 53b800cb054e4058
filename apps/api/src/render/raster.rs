//! Glyph runs as vector paths.
//!
//! Outline faces are traced from rusttype glyph outlines; the built-in face
//! is the union of its lit cells. Paths are built in the coordinates of the
//! clip window, and glyphs that cannot reach the window are skipped, so the
//! cost follows the visible part of a run rather than its full length.

use rusttype::{point, Font, OutlineBuilder, Scale};
use tiny_skia::{Path, PathBuilder, Rect};

use crate::fonts::{builtin, FontHandle};

/// Size of a run's text box before placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunMetrics {
    /// Advance width of the whole run.
    pub run_width: f32,
    pub line_height: f32,
    /// How far ink may reach outside the text box (side bearings, accents).
    pub overhang: u32,
}

pub fn measure(handle: &FontHandle, text: &str) -> RunMetrics {
    match handle {
        FontHandle::Outline { font, px } => {
            let scale = Scale::uniform(*px as f32);
            let v_metrics = font.v_metrics(scale);
            let run_width = font
                .layout(text, scale, point(0.0, v_metrics.ascent))
                .last()
                .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                .unwrap_or(0.0)
                .max(0.0);
            RunMetrics {
                run_width,
                line_height: v_metrics.ascent - v_metrics.descent,
                overhang: (*px as f32 / 4.0).ceil() as u32,
            }
        }
        FontHandle::Builtin { scale } => RunMetrics {
            run_width: builtin::run_width(text, *scale) as f32,
            line_height: (builtin::GLYPH_HEIGHT * scale) as f32,
            overhang: 0,
        },
    }
}

/// Path of `text` with its text box's top-left corner at `origin`.
///
/// Glyphs lying entirely outside the horizontal span `visible` are left out.
/// Returns `None` when nothing inked remains.
pub fn text_path(
    handle: &FontHandle,
    text: &str,
    origin: (f32, f32),
    visible: (f32, f32),
) -> Option<Path> {
    match handle {
        FontHandle::Outline { font, px } => outline_path(font, *px, text, origin, visible),
        FontHandle::Builtin { scale } => builtin_path(*scale, text, origin, visible),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outline faces
// ────────────────────────────────────────────────────────────────────────────

/// Feeds rusttype outline callbacks into a tiny-skia path.
///
/// Positioned glyph outlines arrive relative to the glyph's pixel bounding box,
/// so each glyph sets `dx`/`dy` to that box's corner before tracing.
struct GlyphPath {
    builder: PathBuilder,
    dx: f32,
    dy: f32,
}

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.dx + x, self.dy + y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.dx + x, self.dy + y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(self.dx + x1, self.dy + y1, self.dx + x, self.dy + y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.dx + x1,
            self.dy + y1,
            self.dx + x2,
            self.dy + y2,
            self.dx + x,
            self.dy + y,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

fn outline_path(
    font: &Font<'static>,
    px: u32,
    text: &str,
    origin: (f32, f32),
    visible: (f32, f32),
) -> Option<Path> {
    let scale = Scale::uniform(px as f32);
    let baseline = point(origin.0, origin.1 + font.v_metrics(scale).ascent);

    let mut path = GlyphPath {
        builder: PathBuilder::new(),
        dx: 0.0,
        dy: 0.0,
    };
    for glyph in font.layout(text, scale, baseline) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        if (bb.max.x as f32) < visible.0 {
            continue;
        }
        if (bb.min.x as f32) > visible.1 {
            break;
        }
        path.dx = bb.min.x as f32;
        path.dy = bb.min.y as f32;
        glyph.build_outline(&mut path);
    }
    path.builder.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in face
// ────────────────────────────────────────────────────────────────────────────

fn builtin_path(scale: u32, text: &str, origin: (f32, f32), visible: (f32, f32)) -> Option<Path> {
    let cell = (builtin::ADVANCE * scale) as f32;
    let size = scale as f32;
    let mut builder = PathBuilder::new();

    for (i, c) in text.chars().enumerate() {
        let cell_x = origin.0 + i as f32 * cell;
        if cell_x + cell < visible.0 {
            continue;
        }
        if cell_x > visible.1 {
            break;
        }
        for (row, bits) in builtin::glyph(c).iter().enumerate() {
            for col in 0..builtin::GLYPH_WIDTH {
                if bits & (1 << (builtin::GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let x = cell_x + (col * scale) as f32;
                let y = origin.1 + row as f32 * size;
                if let Some(rect) = Rect::from_xywh(x, y, size, size) {
                    builder.push_rect(rect);
                }
            }
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::bundled_font;

    const EVERYWHERE: (f32, f32) = (f32::MIN, f32::MAX);

    #[test]
    fn test_builtin_metrics() {
        let metrics = measure(&FontHandle::Builtin { scale: 2 }, "HI");
        // (2 * 6 - 1) * 2 = 22 wide, 7 * 2 = 14 tall.
        assert_eq!(metrics.run_width, 22.0);
        assert_eq!(metrics.line_height, 14.0);
        assert_eq!(metrics.overhang, 0);
    }

    #[test]
    fn test_builtin_path_covers_the_lit_cells() {
        let path = text_path(&FontHandle::Builtin { scale: 3 }, "H", (10.0, 20.0), EVERYWHERE)
            .unwrap();
        let bounds = path.bounds();
        assert_eq!(
            (bounds.left(), bounds.top(), bounds.right(), bounds.bottom()),
            (10.0, 20.0, 25.0, 41.0)
        );
    }

    #[test]
    fn test_blank_text_has_no_path() {
        let handle = FontHandle::Builtin { scale: 3 };
        assert!(text_path(&handle, "", (0.0, 0.0), EVERYWHERE).is_none());
        assert!(text_path(&handle, "   ", (0.0, 0.0), EVERYWHERE).is_none());
        assert_eq!(measure(&handle, "").run_width, 0.0);
    }

    #[test]
    fn test_glyphs_outside_the_visible_span_are_skipped() {
        let handle = FontHandle::Builtin { scale: 10 };
        let text = "H".repeat(10_000);
        // Each cell is 60px; only cells overlapping [0, 100] may be traced.
        let path = text_path(&handle, &text, (-300_000.0, 0.0), (0.0, 100.0)).unwrap();
        let bounds = path.bounds();
        assert!(bounds.left() >= -60.0, "left edge {}", bounds.left());
        assert!(bounds.right() <= 160.0, "right edge {}", bounds.right());
    }

    #[test]
    fn test_outline_face_metrics_and_path() {
        let handle = FontHandle::Outline {
            font: bundled_font(),
            px: 32,
        };
        let metrics = measure(&handle, "SALE");
        assert!(metrics.run_width > 32.0);
        assert!((metrics.line_height - 32.0).abs() < 0.5);
        assert_eq!(metrics.overhang, 8);

        let path = text_path(&handle, "SALE", (5.0, 5.0), EVERYWHERE).unwrap();
        let bounds = path.bounds();
        assert!(bounds.left() >= 5.0 && bounds.left() < 12.0);
        assert!(bounds.right() <= 5.0 + metrics.run_width + 1.0);
        assert!(bounds.top() >= 5.0 && bounds.bottom() <= 5.0 + metrics.line_height);
    }
}
