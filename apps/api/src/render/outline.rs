//! Outlined text: a black stroke along the glyph path, then the fill on top.
//!
//! The stroke is centred on the glyph edges at twice the outline width, so
//! after the fill covers the inner half exactly `stroke` pixels show outside.

use image::Rgba;
use tiny_skia::{FillRule, LineJoin, Paint, Path, Pixmap, Stroke, Transform};

const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Paints `path` into `pixmap` with a `stroke`-pixel black outline and `fill`.
///
/// `crisp` turns off anti-aliasing for the fill; the built-in face is pixel art
/// on integer cells and should land on exact pixels.
pub fn paint_outlined(pixmap: &mut Pixmap, path: &Path, stroke: u32, fill: Rgba<u8>, crisp: bool) {
    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color_rgba8(
        OUTLINE_COLOR[0],
        OUTLINE_COLOR[1],
        OUTLINE_COLOR[2],
        OUTLINE_COLOR[3],
    );
    let outline = Stroke {
        width: 2.0 * stroke as f32,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(path, &paint, &outline, Transform::identity(), None);

    paint.anti_alias = !crisp;
    paint.set_color_rgba8(fill[0], fill[1], fill[2], fill[3]);
    pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::{PathBuilder, Rect};

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let p = pixmap.pixel(x, y).unwrap();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    fn rect_path(x: f32, y: f32, w: f32, h: f32) -> Path {
        PathBuilder::from_rect(Rect::from_xywh(x, y, w, h).unwrap())
    }

    #[test]
    fn test_outline_surrounds_fill() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        paint_outlined(&mut pixmap, &rect_path(6.0, 6.0, 8.0, 8.0), 2, Rgba([255, 0, 0, 255]), true);

        assert_eq!(pixel(&pixmap, 10, 10), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 6, 10), [255, 0, 0, 255]);
        // Two pixels of solid black outside each edge.
        assert_eq!(pixel(&pixmap, 5, 10), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 4, 10), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 15, 10), [0, 0, 0, 255]);
        // Beyond the outline nothing is painted.
        assert_eq!(pixel(&pixmap, 2, 10)[3], 0);
        assert_eq!(pixel(&pixmap, 0, 0)[3], 0);
    }

    #[test]
    fn test_hairline_strokes_still_get_an_outline() {
        let mut pixmap = Pixmap::new(24, 24).unwrap();
        paint_outlined(&mut pixmap, &rect_path(10.0, 4.0, 0.3, 16.0), 2, Rgba([255, 255, 255, 255]), false);
        assert_eq!(pixel(&pixmap, 8, 12), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 11, 12), [0, 0, 0, 255]);
    }

    #[test]
    fn test_translucent_fill_keeps_its_alpha() {
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        paint_outlined(&mut pixmap, &rect_path(3.0, 3.0, 4.0, 4.0), 1, Rgba([0, 0, 255, 128]), true);
        // Fill over the inner half of the stroke: half blue over black.
        let [r, g, b, a] = pixel(&pixmap, 3, 5);
        assert_eq!((r, g, a), (0, 0, 255));
        assert!(b > 100 && b < 140, "premultiplied blue {b}");
        // Interior: fill over transparent.
        assert_eq!(pixel(&pixmap, 5, 5)[3], 128);
    }
}
