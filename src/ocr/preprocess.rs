//! Raster normalization ahead of recognition

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};

/// Images whose shorter side is below this are upscaled before recognition
pub const UPSCALE_THRESHOLD: u32 = 1000;

/// Upscale factor for small images
pub const UPSCALE_FACTOR: u32 = 2;

/// Grayscale, 3x3 median denoise, upscale small images 2x with Lanczos,
/// then stretch contrast to the full intensity range.
///
/// The size check runs once per call.
pub fn preprocess(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray;
    }

    let denoised = imageproc::filter::median_filter(&gray, 1, 1);

    let scaled = if width.min(height) < UPSCALE_THRESHOLD {
        image::imageops::resize(
            &denoised,
            width * UPSCALE_FACTOR,
            height * UPSCALE_FACTOR,
            FilterType::Lanczos3,
        )
    } else {
        denoised
    };

    autocontrast(&scaled)
}

/// Linearly map the darkest pixel to 0 and the brightest to 255.
///
/// A flat image is returned unchanged.
pub fn autocontrast(image: &GrayImage) -> GrayImage {
    let (lo, hi) = image
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    if hi <= lo {
        return image.clone();
    }

    let range = f32::from(hi - lo);
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let stretched = f32::from(pixel.0[0] - lo) * 255.0 / range;
        pixel.0[0] = stretched.round().clamp(0.0, 255.0) as u8;
    }
    out
}
