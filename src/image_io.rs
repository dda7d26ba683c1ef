// Raster adapters around the `image` crate. Everything here converts
// between files and the in-memory arrays the pipeline works on; the core
// modules never touch the filesystem.

use crate::error::SegError;
use image::{DynamicImage, RgbaImage};
use ndarray::{Array2, Array3};

/// Load a slice image as a single 8-bit channel. RGBA inputs composite the
/// red channel over white by alpha; opaque color inputs use the green
/// channel; grayscale passes through.
pub fn load_grayscale(path: &str) -> Result<Array2<u8>, SegError> {
    let image = image::open(path)?;
    return Ok(match image {
        DynamicImage::ImageRgba8(rgba) => {
            let (width, height) = rgba.dimensions();
            Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
                let p = rgba.get_pixel(c as u32, r as u32).0;
                let alpha = p[3] as f32 / 255.0;
                (p[0] as f32 * alpha + 255.0 * (1.0 - alpha))
                    .round()
                    .clamp(0.0, 255.0) as u8
            })
        }
        DynamicImage::ImageLuma8(gray) => {
            let (width, height) = gray.dimensions();
            Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
                gray.get_pixel(c as u32, r as u32).0[0]
            })
        }
        other => {
            let rgb = other.to_rgb8();
            let (width, height) = rgb.dimensions();
            Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
                rgb.get_pixel(c as u32, r as u32).0[1]
            })
        }
    });
}

/// Load an annotation image as an RGBA plane (rows, cols, 4).
pub fn load_rgba(path: &str) -> Result<Array3<u8>, SegError> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    return Ok(Array3::from_shape_fn(
        (height as usize, width as usize, 4),
        |(r, c, ch)| rgba.get_pixel(c as u32, r as u32).0[ch],
    ));
}

pub fn save_rgba(path: &str, rgba: &Array3<u8>) -> Result<(), SegError> {
    let (nrows, ncols, _) = rgba.dim();
    let mut out = RgbaImage::new(ncols as u32, nrows as u32);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        for ch in 0..4 {
            pixel.0[ch] = rgba[[y as usize, x as usize, ch]];
        }
    }
    out.save(path)?;
    return Ok(());
}

/// Write a binary mask as transparent background / opaque red foreground.
pub fn save_mask(path: &str, mask: &Array2<bool>) -> Result<(), SegError> {
    let rgba = mask.mapv(|v| v as u32);
    let table = crate::labels::palette::ColorTable::new(vec![[0, 0, 0, 0], [255, 0, 0, 255]]);
    return save_rgba(path, &table.recolor(&rgba));
}
