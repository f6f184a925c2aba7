//! Writing the rendered color buffer out to image files.

use std::path::Path;

use image::{ImageError, RgbaImage};

/// Convert a BGRA byte buffer to RGBA, preserving row order.
pub fn bgra_to_rgba(bgra: &[u8]) -> Vec<u8> {
    let mut rgba = bgra.to_vec();
    for pixel in rgba.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    rgba
}

/// Save a BGRA color buffer to an image file. The format is chosen from
/// the file extension (`.bmp`, `.png`, ...).
///
/// # Panics
/// Panics if the buffer does not hold `width * height` BGRA pixels.
pub fn save<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    bgra: &[u8],
) -> Result<(), ImageError> {
    assert_eq!(
        bgra.len(),
        (width * height * 4) as usize,
        "buffer size doesn't match dimensions"
    );
    let image = RgbaImage::from_raw(width, height, bgra_to_rgba(bgra))
        .expect("buffer length was checked against the dimensions");
    image.save(path)
}
