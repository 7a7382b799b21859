// texture/ - Refracted background appearance of a drop
//
// Pipeline:
//   1. Crop the background to the matte size (centered)
//   2. Gaussian blur
//   3. Fisheye undistortion with a radius-dependent camera
//   4. Matte as alpha channel
//   5. Flip top-bottom (the refracted scene appears inverted)

pub mod fisheye;

pub use fisheye::{DropLens, FisheyeCamera, Intrinsics};

use image::{imageops, Rgba, RgbImage, RgbaImage};
use ndarray::Array2;

use crate::config::RaindropConfig;
use crate::error::{DropError, DropResult};

/// Render the RGBA texture of a drop with the given `radius` and `alpha` matte.
///
/// `background` must be at least as large as the matte in both dimensions.
/// Larger patches are center-cropped to the matte size.
pub fn synthesize_texture(
    background: &RgbImage,
    alpha: &Array2<f32>,
    radius: u32,
    cfg: &RaindropConfig,
) -> DropResult<RgbaImage> {
    let (rows, cols) = alpha.dim();
    let (w, h) = (cols as u32, rows as u32);
    let (bw, bh) = background.dimensions();
    if bw < w || bh < h {
        return Err(DropError::BackgroundTooSmall { needed: (w, h), got: (bw, bh) });
    }

    let patch = imageops::crop_imm(background, (bw - w) / 2, (bh - h) / 2, w, h).to_image();
    let blurred = imageops::blur(&patch, cfg.texture_blur_sigma);
    let refracted = DropLens::for_radius(radius, cfg).refract(&blurred);

    let mut texture = RgbaImage::from_fn(w, h, |x, y| {
        let [r, g, b] = refracted.get_pixel(x, y).0;
        Rgba([r, g, b, alpha_byte(alpha[[y as usize, x as usize]])])
    });
    imageops::flip_vertical_in_place(&mut texture);

    Ok(texture)
}

/// Matte value as an 8-bit alpha sample (truncating).
#[inline]
pub fn alpha_byte(a: f32) -> u8 {
    if a.is_nan() { 0 } else { a.clamp(0.0, 255.0) as u8 }
}
