//! Shared test utilities for synthetic source images.

use image::RgbImage;

/// Encode a small valid JPEG with the given dimensions, fully in memory.
///
/// The pixel gradient keeps neighboring pixels distinct so resize output
/// is a real image rather than a flat fill.
pub fn test_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buf);
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, image::ImageFormat::Jpeg)
        .unwrap();
    buf
}
