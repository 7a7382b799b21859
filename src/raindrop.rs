// raindrop.rs - Single drop record
//
// A drop is either generated from a radius (shape rasterized here) or built
// from a label mask and alpha matte produced elsewhere. Placement and
// collision passes live outside this crate; they read geometry and write
// collision results back through `set_collision`.

use image::{RgbImage, RgbaImage};
use log::debug;
use ndarray::Array2;
use rand::Rng;

use crate::config::RaindropConfig;
use crate::error::{DropError, DropResult};
use crate::shape::{self, DropKind, RadiusRange};
use crate::texture::synthesize_texture;

/// Identifier assigned by the placement pass.
pub type DropKey = u32;

/// How the generative path obtains its radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSize {
    /// Fixed radius, no range. The lobe is as tall as the head is wide.
    Radius(u32),
    /// Fixed radius whose position in `range` sets the lobe height.
    Within { radius: u32, range: RadiusRange },
    /// Radius drawn uniformly from the inclusive range.
    Sampled(RadiusRange),
}

impl DropSize {
    /// Resolve to a concrete radius plus the range to keep, if any.
    pub fn resolve<R: Rng>(self, rng: &mut R) -> DropResult<(u32, Option<RadiusRange>)> {
        let (radius, range) = match self {
            DropSize::Radius(radius) => (radius, None),
            DropSize::Within { radius, range } => (radius, Some(range)),
            DropSize::Sampled(range) => (rng.gen_range(range.lo()..=range.hi()), Some(range)),
        };
        if radius == 0 {
            return Err(DropError::InvalidRadius { radius });
        }
        Ok((radius, range))
    }
}

#[derive(Debug, Clone)]
pub struct Raindrop {
    key: DropKey,
    center: (f32, f32),

    radius: u32,
    radius_range: Option<RadiusRange>,
    vertical_radius: u32,
    kind: DropKind,

    label: Array2<u8>,
    alpha: Array2<f32>,
    texture: Option<RgbaImage>,
    background: Option<RgbImage>,

    collided: bool,
    collides_with: Vec<DropKey>,

    use_label: bool,
    config: RaindropConfig,
}

impl Raindrop {
    /// Default-kind drop with a fixed radius and the default config.
    pub fn new(key: DropKey, center: (f32, f32), radius: u32) -> DropResult<Self> {
        Self::shaped(
            key,
            center,
            radius,
            None,
            DropKind::Default,
            RaindropConfig::default(),
        )
    }

    /// Generative path: resolve the radius, derive the lobe, rasterize.
    pub fn generate<R: Rng>(
        key: DropKey,
        center: (f32, f32),
        size: DropSize,
        kind: DropKind,
        config: &RaindropConfig,
        rng: &mut R,
    ) -> DropResult<Self> {
        let (radius, range) = size.resolve(rng)?;
        Self::shaped(key, center, radius, range, kind, config.clone())
    }

    fn shaped(
        key: DropKey,
        center: (f32, f32),
        radius: u32,
        radius_range: Option<RadiusRange>,
        kind: DropKind,
        config: RaindropConfig,
    ) -> DropResult<Self> {
        if radius == 0 {
            return Err(DropError::InvalidRadius { radius });
        }
        config.validate()?;
        let vertical_radius = shape::vertical_radius(radius, radius_range, &config);
        let shape = shape::synthesize(kind, radius, vertical_radius, &config)?;

        debug!(
            "drop {} shaped: r={} v={} canvas={:?}",
            key,
            radius,
            vertical_radius,
            shape.label.dim()
        );

        Ok(Self {
            key,
            center,
            radius,
            radius_range,
            vertical_radius,
            kind,
            label: shape.label,
            alpha: shape.alpha,
            texture: None,
            background: None,
            collided: false,
            collides_with: Vec::new(),
            use_label: false,
            config,
        })
    }

    /// Ingested path: adopt a precomputed label mask and alpha matte.
    ///
    /// The radius is inferred as `min(cols / 4, rows / 4)` and the lobe as
    /// `round(1.3 * sqrt(3) * radius)`. The label is stored as given.
    pub fn from_label(
        key: DropKey,
        center: (f32, f32),
        label: Array2<u8>,
        alpha: Array2<f32>,
    ) -> DropResult<Self> {
        if label.dim() != alpha.dim() {
            return Err(DropError::DimensionMismatch { label: label.dim(), alpha: alpha.dim() });
        }
        let (rows, cols) = label.dim();
        let radius = (cols / 4).min(rows / 4) as u32;
        if radius == 0 {
            return Err(DropError::LabelTooSmall { rows, cols });
        }
        let vertical_radius = (1.3 * 3f64.sqrt() * radius as f64).round() as u32;

        debug!("drop {} ingested: {}x{} -> r={} v={}", key, rows, cols, radius, vertical_radius);

        Ok(Self {
            key,
            center,
            radius,
            radius_range: None,
            vertical_radius,
            kind: DropKind::Default,
            label,
            alpha,
            texture: None,
            background: None,
            collided: false,
            collides_with: Vec::new(),
            use_label: true,
            config: RaindropConfig::default(),
        })
    }

    /// Replace the config used by later `update_texture` calls.
    pub fn with_config(mut self, config: RaindropConfig) -> Self {
        self.config = config;
        self
    }

    /// Tag an ingested drop with the kind its mask was produced for.
    pub fn with_kind(mut self, kind: DropKind) -> Self {
        self.kind = kind;
        self
    }

    /// Render the refracted appearance over `background`.
    ///
    /// On error the previous texture is left untouched.
    pub fn update_texture(&mut self, background: &RgbImage) -> DropResult<()> {
        let texture = synthesize_texture(background, &self.alpha, self.radius, &self.config)?;
        debug!("drop {} textured: {:?}", self.key, texture.dimensions());
        self.texture = Some(texture);
        self.background = Some(background.clone());
        Ok(())
    }

    /// Record the outcome of an external collision pass. Not validated.
    pub fn set_collision(&mut self, collided: bool, with: Vec<DropKey>) {
        self.collided = collided;
        self.collides_with = with;
    }

    pub fn set_key(&mut self, key: DropKey) { self.key = key; }

    pub fn key(&self) -> DropKey { self.key }
    pub fn center(&self) -> (f32, f32) { self.center }
    pub fn radius(&self) -> u32 { self.radius }
    pub fn radius_range(&self) -> Option<RadiusRange> { self.radius_range }
    pub fn vertical_radius(&self) -> u32 { self.vertical_radius }
    pub fn kind(&self) -> DropKind { self.kind }
    pub fn label_map(&self) -> &Array2<u8> { &self.label }
    pub fn alpha_map(&self) -> &Array2<f32> { &self.alpha }
    pub fn texture(&self) -> Option<&RgbaImage> { self.texture.as_ref() }
    pub fn background(&self) -> Option<&RgbImage> { self.background.as_ref() }
    pub fn collided(&self) -> bool { self.collided }
    pub fn collision_list(&self) -> &[DropKey] { &self.collides_with }
    pub fn use_label(&self) -> bool { self.use_label }
    pub fn config(&self) -> &RaindropConfig { &self.config }

    /// Canvas shape (rows, cols) shared by label and alpha.
    pub fn canvas_dim(&self) -> (usize, usize) { self.label.dim() }
}
