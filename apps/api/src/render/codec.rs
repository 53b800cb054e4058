use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};

/// An uploaded image decoded to RGBA8 for compositing.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
    /// Whether the source had an alpha channel; output keeps the same shape.
    pub has_alpha: bool,
}

/// Decodes any format the `image` crate was built with (PNG, JPEG).
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    Ok(DecodedImage {
        has_alpha: img.color().has_alpha(),
        pixels: img.to_rgba8(),
    })
}

/// Encodes as PNG, dropping the alpha channel when `keep_alpha` is false.
pub fn encode_png(pixels: &RgbaImage, keep_alpha: bool) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    if keep_alpha {
        pixels.write_to(&mut out, ImageFormat::Png)?;
    } else {
        DynamicImage::ImageRgba8(pixels.clone())
            .to_rgb8()
            .write_to(&mut out, ImageFormat::Png)?;
    }
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    #[test]
    fn test_rgb_input_stays_rgb() {
        let src = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));
        let mut png = Cursor::new(Vec::new());
        src.write_to(&mut png, ImageFormat::Png).unwrap();

        let decoded = decode_image(png.get_ref()).unwrap();
        assert!(!decoded.has_alpha);
        assert_eq!(decoded.pixels.dimensions(), (4, 3));
        assert_eq!(*decoded.pixels.get_pixel(0, 0), Rgba([10, 20, 30, 255]));

        let encoded = encode_png(&decoded.pixels, decoded.has_alpha).unwrap();
        let reloaded = image::load_from_memory(&encoded).unwrap();
        assert_eq!(reloaded.color(), image::ColorType::Rgb8);
        assert_eq!(reloaded.to_rgb8(), src);
    }

    #[test]
    fn test_rgba_input_keeps_alpha() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 100]));
        let encoded = encode_png(&src, true).unwrap();
        let decoded = decode_image(&encoded).unwrap();
        assert!(decoded.has_alpha);
        assert_eq!(decoded.pixels, src);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_image(b"not an image at all").is_err());
    }
}
