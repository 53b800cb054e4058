//! Text Compositor — paints a validated layout onto a copy of the base image.
//!
//! Per element, in list order:
//! 1. pixel size = round(H × size% / 100), at least 1
//! 2. resolve the face for the element's style
//! 3. anchor = (round(W × x%), round(H × y%))
//! 4. horizontal placement from alignment, vertical centre on the anchor
//! 5. stroke = max(1, round(px / 15)), always black
//! 6. stroke, then fill, the glyph path in a layer the size of the visible
//!    part of the text box, and blend that layer onto the canvas
//!
//! CPU-bound: callers on the async runtime run this inside `spawn_blocking`.

pub mod codec;
pub mod outline;
pub mod raster;

use image::{Rgba, RgbaImage};
use tiny_skia::{Pixmap, PremultipliedColorU8};
use tracing::debug;

use crate::fonts::FontResolver;
use crate::layout::{Alignment, LayoutDescription, TextElement};

pub use codec::{decode_image, encode_png, DecodedImage};

/// Paints every element of `layout` over a copy of `base`. `base` is never modified.
pub fn composite(base: &RgbaImage, layout: &LayoutDescription, fonts: &FontResolver) -> RgbaImage {
    let mut canvas = base.clone();
    for element in layout.elements() {
        paint_element(&mut canvas, element, fonts);
    }
    canvas
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Font pixel size for a percentage of the image height. Never below 1.
pub fn pixel_size(height: u32, size_percentage: f32) -> u32 {
    let px = (height as f32 * size_percentage / 100.0).round();
    if px < 1.0 {
        1
    } else {
        px as u32
    }
}

pub fn stroke_width(px: u32) -> u32 {
    ((px as f32 / 15.0).round() as u32).max(1)
}

/// Anchor pixel for percentage coordinates.
pub fn anchor_point(width: u32, height: u32, x_percentage: f32, y_percentage: f32) -> (i64, i64) {
    (
        (width as f32 * x_percentage / 100.0).round() as i64,
        (height as f32 * y_percentage / 100.0).round() as i64,
    )
}

/// Top-left corner of the text box for a run anchored at `anchor`.
fn text_box_origin(
    anchor: (i64, i64),
    alignment: Alignment,
    run_width: f32,
    line_height: f32,
) -> (i64, i64) {
    let (ax, ay) = (anchor.0 as f32, anchor.1 as f32);
    let left = match alignment {
        Alignment::Left => ax,
        Alignment::Center => ax - run_width / 2.0,
        Alignment::Right => ax - run_width,
    };
    let top = ay - line_height / 2.0;
    (left.round() as i64, top.round() as i64)
}

/// Region of the canvas an element can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClipWindow {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl ClipWindow {
    /// Intersection of the box `[left, right) × [top, bottom)` with the canvas.
    fn clip(left: i64, top: i64, right: i64, bottom: i64, canvas: (u32, u32)) -> Option<Self> {
        let x0 = left.max(0);
        let y0 = top.max(0);
        let x1 = right.min(i64::from(canvas.0));
        let y1 = bottom.min(i64::from(canvas.1));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Painting
// ────────────────────────────────────────────────────────────────────────────

fn paint_element(canvas: &mut RgbaImage, element: &TextElement, fonts: &FontResolver) {
    if element.text.is_empty() {
        return;
    }
    let (width, height) = canvas.dimensions();
    let px = pixel_size(height, element.size_percentage);
    let face = fonts.resolve(element.font_style, px);
    let anchor = anchor_point(width, height, element.x_percentage, element.y_percentage);
    let stroke = stroke_width(px);
    debug!(
        "painting {:?} at {anchor:?}: {px}px {} ({face:?}), stroke {stroke}",
        element.text, element.font_style
    );
    if face.is_builtin() {
        debug!("style '{}' rendered with the built-in face", element.font_style);
    }

    let metrics = raster::measure(&face, &element.text);
    let (left, top) = text_box_origin(anchor, element.alignment, metrics.run_width, metrics.line_height);
    let pad = i64::from(stroke + metrics.overhang) + 1;
    let right = left + metrics.run_width.ceil() as i64;
    let bottom = top + metrics.line_height.ceil() as i64;
    let Some(window) = ClipWindow::clip(left - pad, top - pad, right + pad, bottom + pad, (width, height))
    else {
        debug!("{:?} lies outside the image", element.text);
        return;
    };

    let origin = (
        (left - i64::from(window.x)) as f32,
        (top - i64::from(window.y)) as f32,
    );
    let visible = (-(pad as f32), (i64::from(window.width) + pad) as f32);
    let Some(path) = raster::text_path(&face, &element.text, origin, visible) else {
        return;
    };
    let Some(mut layer) = Pixmap::new(window.width, window.height) else {
        return;
    };
    outline::paint_outlined(&mut layer, &path, stroke, element.color, face.is_builtin());
    blend_layer(canvas, &layer, window);
}

/// Source-over blends a premultiplied layer onto the canvas at the window's corner.
fn blend_layer(canvas: &mut RgbaImage, layer: &Pixmap, window: ClipWindow) {
    let layer_width = layer.width();
    for (idx, src) in layer.pixels().iter().enumerate() {
        if src.alpha() == 0 {
            continue;
        }
        let x = window.x + idx as u32 % layer_width;
        let y = window.y + idx as u32 / layer_width;
        let dst = canvas.get_pixel_mut(x, y);
        *dst = source_over(*src, *dst);
    }
}

fn source_over(src: PremultipliedColorU8, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = f32::from(src.alpha()) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let src_rgb = [src.red(), src.green(), src.blue()];

    let mut out = [0u8; 4];
    for c in 0..3 {
        let premultiplied = f32::from(src_rgb[c]) / 255.0 + f32::from(dst[c]) / 255.0 * da * (1.0 - sa);
        out[c] = (premultiplied / out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}
