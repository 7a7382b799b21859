//! Tunable synthesis constants.
//!
//! [`RaindropConfig`] mirrors every constant below. The defaults reproduce the
//! reference look; override any subset from TOML:
//!
//! ```toml
//! matte_blur_sigma = 8.0
//! magnification = 1.5
//! ```
//!
//! Missing keys fall back to the compiled defaults. The lens constants are
//! empirical visual-effect values, so prefer comparing rendered output over
//! reasoning about them in closed form.

use std::path::Path;

use serde::Deserialize;

use crate::error::{DropError, DropResult};

// ── Shape ────────────────────────────────────────────────────────────────────

/// Gain applied to `per · √3 · radius` when deriving the vertical radius.
pub const VERTICAL_GAIN: f64 = 0.8;

/// Upper bound of `vertical_radius / radius`.
pub const MAX_VERTICAL_RATIO: f64 = 2.4;

/// Largest lobe ratio the (5r, 4r) canvas holds: the head center sits on row 3r.
pub const CANVAS_VERTICAL_RATIO: f64 = 3.0;

/// Gaussian sigma used to soften the silhouette into the alpha matte.
pub const MATTE_BLUR_SIGMA: f32 = 10.0;

// ── Texture ──────────────────────────────────────────────────────────────────

/// Gaussian sigma applied to the background patch before refraction.
pub const TEXTURE_BLUR_SIGMA: f32 = 5.0;

/// Horizontal focal length of the drop camera, in multiples of the radius.
pub const FOCAL_SCALE_X: f64 = 30.0;

/// Vertical focal length of the drop camera, in multiples of the radius.
pub const FOCAL_SCALE_Y: f64 = 20.0;

/// Factor applied, together with `radius^(1/3)`, to the rectified focal lengths.
pub const MAGNIFICATION: f64 = 2.0;

/// Fisheye coefficients `k1..k4`. All zero: only the projective change applies.
pub const DISTORTION: [f64; 4] = [0.0; 4];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RaindropConfig {
    pub vertical_gain: f64,
    pub max_vertical_ratio: f64,
    pub matte_blur_sigma: f32,

    pub texture_blur_sigma: f32,
    pub focal_scale_x: f64,
    pub focal_scale_y: f64,
    pub magnification: f64,
    pub distortion: [f64; 4],
}

impl Default for RaindropConfig {
    fn default() -> Self {
        Self {
            vertical_gain: VERTICAL_GAIN,
            max_vertical_ratio: MAX_VERTICAL_RATIO,
            matte_blur_sigma: MATTE_BLUR_SIGMA,
            texture_blur_sigma: TEXTURE_BLUR_SIGMA,
            focal_scale_x: FOCAL_SCALE_X,
            focal_scale_y: FOCAL_SCALE_Y,
            magnification: MAGNIFICATION,
            distortion: DISTORTION,
        }
    }
}

impl RaindropConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> DropResult<Self> {
        let cfg: Self = toml::from_str(src).map_err(|e| DropError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a TOML file. Unlike [`Self::from_toml_str`], a missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> DropResult<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|e| DropError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&src)
    }

    pub fn validate(&self) -> DropResult<()> {
        positive("vertical_gain", self.vertical_gain)?;
        positive("matte_blur_sigma", self.matte_blur_sigma as f64)?;
        positive("texture_blur_sigma", self.texture_blur_sigma as f64)?;
        positive("focal_scale_x", self.focal_scale_x)?;
        positive("focal_scale_y", self.focal_scale_y)?;
        positive("magnification", self.magnification)?;
        if !(1.0..=CANVAS_VERTICAL_RATIO).contains(&self.max_vertical_ratio) {
            return Err(DropError::Config(format!(
                "max_vertical_ratio must be within [1.0, {CANVAS_VERTICAL_RATIO}], got {}",
                self.max_vertical_ratio
            )));
        }
        if self.distortion.iter().any(|k| !k.is_finite()) {
            return Err(DropError::Config("distortion coefficients must be finite".into()));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> DropResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(DropError::Config(format!("{name} must be positive, got {value}")))
    }
}
