// teardrop.rs - Default drop silhouette
//
// Round head plus a half ellipse stretched toward row 0. The ellipse covers
// the 180..360 degree arc, which in raster coordinates (y down) is every row
// at or above the head center.

use ndarray::Array2;

use super::{canvas_dim, head_center};

/// Value written for covered pixels before thresholding.
pub const TEARDROP_FILL: u8 = 128;

/// Rasterize the pre-threshold teardrop (values 0 or `TEARDROP_FILL`).
pub fn rasterize_teardrop(radius: u32, vertical_radius: u32) -> Array2<u8> {
    let mut canvas = Array2::zeros(canvas_dim(radius));
    let (cx, cy) = head_center(radius);

    fill_disk(&mut canvas, cx, cy, radius as usize, TEARDROP_FILL);
    fill_upper_half_ellipse(
        &mut canvas,
        cx,
        cy,
        radius as usize,
        vertical_radius as usize,
        TEARDROP_FILL,
    );

    canvas
}

fn fill_disk(canvas: &mut Array2<u8>, cx: usize, cy: usize, r: usize, value: u8) {
    let (rows, cols) = canvas.dim();
    let r2 = (r * r) as i64;

    for y in cy.saturating_sub(r)..(cy + r + 1).min(rows) {
        let dy = y as i64 - cy as i64;
        for x in cx.saturating_sub(r)..(cx + r + 1).min(cols) {
            let dx = x as i64 - cx as i64;
            if dx * dx + dy * dy <= r2 {
                canvas[[y, x]] = value;
            }
        }
    }
}

fn fill_upper_half_ellipse(
    canvas: &mut Array2<u8>,
    cx: usize,
    cy: usize,
    a: usize,
    b: usize,
    value: u8,
) {
    if a == 0 || b == 0 {
        return;
    }
    let (rows, cols) = canvas.dim();
    let (a2, b2) = ((a * a) as f64, (b * b) as f64);

    for y in cy.saturating_sub(b)..(cy + 1).min(rows) {
        let dy = y as f64 - cy as f64;
        for x in cx.saturating_sub(a)..(cx + a + 1).min(cols) {
            let dx = x as f64 - cx as f64;
            if dx * dx / a2 + dy * dy / b2 <= 1.0 {
                canvas[[y, x]] = value;
            }
        }
    }
}
