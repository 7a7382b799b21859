// fisheye.rs - Equidistant fisheye camera model and image undistortion
//
// Model: a normalized point (x, y) at polar radius rho is seen at angle
// theta = atan(rho), distorted to theta_d = theta * (1 + k1 t^2 + k2 t^4 +
// k3 t^6 + k4 t^8), then projected as (fx * x * theta_d / rho + cx, ...).

use image::{Rgb, RgbImage};
use log::trace;

use crate::config::RaindropConfig;

/// Pinhole intrinsics without skew.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl Intrinsics {
    /// Same principal point, focal lengths multiplied by `s`.
    pub fn scale_focal(self, s: f64) -> Self {
        Self { fx: self.fx * s, fy: self.fy * s, ..self }
    }

    #[inline]
    fn unproject(&self, u: f64, v: f64) -> (f64, f64) {
        ((u - self.cx) / self.fx, (v - self.cy) / self.fy)
    }

    #[inline]
    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (self.fx * x + self.cx, self.fy * y + self.cy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisheyeCamera {
    pub k: Intrinsics,
    pub d: [f64; 4],
}

impl FisheyeCamera {
    /// Apply the fisheye distortion to a normalized point.
    pub fn distort(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = (x * x + y * y).sqrt();
        if rho < 1e-8 {
            return (x, y);
        }
        let theta = rho.atan();
        let t2 = theta * theta;
        let [k1, k2, k3, k4] = self.d;
        let theta_d = theta * (1.0 + t2 * (k1 + t2 * (k2 + t2 * (k3 + t2 * k4))));
        let s = theta_d / rho;
        (x * s, y * s)
    }

    /// Source pixel that output pixel (u, v) samples when rectifying into `knew`.
    pub fn source_of(&self, knew: &Intrinsics, u: f64, v: f64) -> (f64, f64) {
        let (x, y) = knew.unproject(u, v);
        let (xd, yd) = self.distort(x, y);
        self.k.project(xd, yd)
    }

    /// Remove the fisheye distortion from `src`, re-projecting through `knew`.
    ///
    /// Output has the size of `src`. Samples are bilinear; taps that fall
    /// outside the source read as black.
    pub fn undistort_image(&self, src: &RgbImage, knew: &Intrinsics) -> RgbImage {
        let (w, h) = src.dimensions();
        trace!("undistort {}x{} with K={:?} Knew={:?}", w, h, self.k, knew);

        RgbImage::from_fn(w, h, |u, v| {
            let (sx, sy) = self.source_of(knew, u as f64, v as f64);
            sample_bilinear(src, sx, sy)
        })
    }
}

/// Lens parameters for one drop: distorted camera and rectified intrinsics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropLens {
    pub camera: FisheyeCamera,
    pub rectified: Intrinsics,
}

impl DropLens {
    /// Camera whose focal lengths grow with the radius and whose rectified
    /// focal lengths are further magnified by `radius^(1/3)`, so small and
    /// large drops bend the background differently.
    pub fn for_radius(radius: u32, cfg: &RaindropConfig) -> Self {
        let r = radius as f64;
        let k = Intrinsics {
            fx: cfg.focal_scale_x * r,
            fy: cfg.focal_scale_y * r,
            cx: 2.0 * r,
            cy: 3.0 * r,
        };
        let rectified = k.scale_focal(r.cbrt() * cfg.magnification);
        Self {
            camera: FisheyeCamera { k, d: cfg.distortion },
            rectified,
        }
    }

    pub fn refract(&self, src: &RgbImage) -> RgbImage {
        self.camera.undistort_image(src, &self.rectified)
    }
}

fn sample_bilinear(src: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    if !x.is_finite() || !y.is_finite() {
        return Rgb([0, 0, 0]);
    }
    let (w, h) = (src.width() as i64, src.height() as i64);
    let (x0, y0) = (x.floor(), y.floor());
    let (ax, ay) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let tap = |xi: i64, yi: i64| -> [f64; 3] {
        if xi < 0 || yi < 0 || xi >= w || yi >= h {
            return [0.0; 3];
        }
        let p = src.get_pixel(xi as u32, yi as u32).0;
        [p[0] as f64, p[1] as f64, p[2] as f64]
    };

    let (p00, p10) = (tap(x0, y0), tap(x0 + 1, y0));
    let (p01, p11) = (tap(x0, y0 + 1), tap(x0 + 1, y0 + 1));

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] + (p10[c] - p00[c]) * ax;
        let bottom = p01[c] + (p11[c] - p01[c]) * ax;
        out[c] = (top + (bottom - top) * ay).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}
