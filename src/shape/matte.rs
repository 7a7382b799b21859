// matte.rs - Soft alpha matte from a crisp silhouette

use image::{imageops, GrayImage, Luma};
use ndarray::Array2;

/// Gaussian-blur `silhouette` and rescale so its peak is exactly 255.
///
/// The blur runs on 8-bit samples, so the matte keeps the quantization of
/// the blurred silhouette. An empty silhouette yields an all-zero matte.
pub fn alpha_matte(silhouette: &Array2<u8>, sigma: f32) -> Array2<f32> {
    let (rows, cols) = silhouette.dim();
    if rows == 0 || cols == 0 {
        return Array2::zeros((rows, cols));
    }

    let gray = GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        Luma([silhouette[[y as usize, x as usize]]])
    });
    let blurred = imageops::blur(&gray, sigma);

    let peak = blurred.pixels().map(|p| p.0[0]).max().unwrap_or(0);
    if peak == 0 {
        return Array2::zeros((rows, cols));
    }
    let peak = peak as f32;

    Array2::from_shape_fn((rows, cols), |(y, x)| {
        blurred.get_pixel(x as u32, y as u32).0[0] as f32 / peak * 255.0
    })
}
