// shape/ - Drop silhouettes
//
// Every kind renders onto its own (5r, 4r) canvas (rows x cols) with the
// drop head centered at column 2r, row 3r. Output is a binary label mask
// plus a soft alpha matte of the same shape.

mod matte;
mod teardrop;

pub use matte::alpha_matte;
pub use teardrop::{rasterize_teardrop, TEARDROP_FILL};

use ndarray::Array2;

use crate::config::RaindropConfig;
use crate::error::{DropError, DropResult};

/// Shape variant of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropKind {
    #[default]
    Default,
    /// Declared for ingested masks; there is no generator for it.
    Splash,
}

/// Inclusive radius bounds used for sampling and shape derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RadiusRange {
    lo: u32,
    hi: u32,
}

impl RadiusRange {
    pub fn new(lo: u32, hi: u32) -> DropResult<Self> {
        if lo == 0 || lo > hi {
            return Err(DropError::InvalidRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    pub fn lo(&self) -> u32 { self.lo }
    pub fn hi(&self) -> u32 { self.hi }

    /// Position of `radius` within the range, 0 at `lo` and 1 at `hi`.
    /// A single-value range has no spread, so every radius maps to 0.
    /// Radii outside the range extrapolate.
    pub fn percentile(&self, radius: u32) -> f64 {
        if self.hi == self.lo {
            return 0.0;
        }
        (radius as f64 - self.lo as f64) / (self.hi - self.lo) as f64
    }
}

/// Label mask and alpha matte sharing one canvas shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DropShape {
    pub label: Array2<u8>,
    pub alpha: Array2<f32>,
}

/// Canvas shape (rows, cols) for a drop of the given radius.
#[inline]
pub fn canvas_dim(radius: u32) -> (usize, usize) {
    let r = radius as usize;
    (5 * r, 4 * r)
}

/// Drop head center (x, y) = (column, row) on its canvas.
#[inline]
pub fn head_center(radius: u32) -> (usize, usize) {
    let r = radius as usize;
    (2 * r, 3 * r)
}

/// Half-height of the elongated lobe.
///
/// Grows with the radius' percentile in its range and is kept within
/// `[radius, max_vertical_ratio * radius]`. Without a range the lobe is as
/// tall as the head is wide.
pub fn vertical_radius(radius: u32, range: Option<RadiusRange>, cfg: &RaindropConfig) -> u32 {
    let per = range.map_or(0.0, |r| r.percentile(radius));
    let r = radius as f64;

    // Float to int casts truncate toward zero
    let grown = (cfg.vertical_gain * per * 3f64.sqrt() * r) as i64;
    let v = grown.max(radius as i64) as f64;
    v.min(cfg.max_vertical_ratio * r) as u32
}

/// Render the label mask and alpha matte for `kind`.
pub fn synthesize(
    kind: DropKind,
    radius: u32,
    vertical_radius: u32,
    cfg: &RaindropConfig,
) -> DropResult<DropShape> {
    match kind {
        DropKind::Default => {
            let silhouette = rasterize_teardrop(radius, vertical_radius);
            let alpha = alpha_matte(&silhouette, cfg.matte_blur_sigma);
            let label = silhouette.mapv(|v| u8::from(v > 0));
            Ok(DropShape { label, alpha })
        }
        DropKind::Splash => Err(DropError::UnsupportedShape(kind)),
    }
}
