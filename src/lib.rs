use wasm_bindgen::prelude::*;

// ============================================================================
// RAINDROP SYNTH - Single drop sprites for rain augmentation
// ============================================================================
//
// shape/    label mask + alpha matte for a drop kind
// texture/  blurred, lens-refracted background with the matte as alpha
// raindrop  the drop record consumed by placement and collision passes

pub mod config;
pub mod error;
pub mod raindrop;
pub mod shape;
pub mod texture;

pub use config::RaindropConfig;
pub use error::{DropError, DropResult};
pub use raindrop::{DropKey, DropSize, Raindrop};
pub use shape::{DropKind, DropShape, RadiusRange};

use image::{DynamicImage, RgbImage, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// WASM export
// ============================================================================

/// One drop exposed to JS. Buffers are row-major and stay valid until the
/// next mutating call.
#[wasm_bindgen]
pub struct RaindropSprite {
    drop: Raindrop,
    alpha: Vec<u8>,
    texture: Vec<u8>,
}

#[wasm_bindgen]
impl RaindropSprite {
    #[wasm_bindgen(constructor)]
    pub fn new(key: u32, cx: f32, cy: f32, radius: u32) -> Result<RaindropSprite, JsError> {
        Ok(Self::wrap(Raindrop::new(key, (cx, cy), radius)?))
    }

    /// Radius drawn from `[lo, hi]` with a seeded RNG.
    pub fn sampled(key: u32, cx: f32, cy: f32, lo: u32, hi: u32, seed: u32) -> Result<RaindropSprite, JsError> {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let size = DropSize::Sampled(RadiusRange::new(lo, hi)?);
        let drop = Raindrop::generate(key, (cx, cy), size, DropKind::Default, &RaindropConfig::default(), &mut rng)?;
        Ok(Self::wrap(drop))
    }

    /// Texture from canvas `ImageData` bytes (RGBA, alpha ignored).
    pub fn texture_from_rgba(&mut self, rgba: &[u8], w: u32, h: u32) -> Result<(), JsError> {
        let rgb = rgb_from_rgba(rgba, w, h)?;
        self.drop.update_texture(&rgb)?;
        self.texture = self.drop.texture().map(|t| t.as_raw().clone()).unwrap_or_default();
        Ok(())
    }

    pub fn set_collision(&mut self, collided: bool, with: Vec<u32>) {
        self.drop.set_collision(collided, with);
    }

    /// Copy of the 0/1 label mask.
    pub fn label(&self) -> js_sys::Uint8Array {
        let flat: Vec<u8> = self.drop.label_map().iter().copied().collect();
        js_sys::Uint8Array::from(flat.as_slice())
    }

    pub fn collisions(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(self.drop.collision_list())
    }

    pub fn alpha_ptr(&self) -> *const u8 { self.alpha.as_ptr() }
    pub fn alpha_len(&self) -> usize { self.alpha.len() }
    pub fn texture_ptr(&self) -> *const u8 { self.texture.as_ptr() }
    pub fn texture_len(&self) -> usize { self.texture.len() }
    pub fn width(&self) -> u32 { self.drop.canvas_dim().1 as u32 }
    pub fn height(&self) -> u32 { self.drop.canvas_dim().0 as u32 }
    pub fn radius(&self) -> u32 { self.drop.radius() }
    pub fn vertical_radius(&self) -> u32 { self.drop.vertical_radius() }
    pub fn key(&self) -> u32 { self.drop.key() }
    pub fn set_key(&mut self, key: u32) { self.drop.set_key(key); }
    pub fn collided(&self) -> bool { self.drop.collided() }
}

impl RaindropSprite {
    fn wrap(drop: Raindrop) -> Self {
        let alpha = drop.alpha_map().iter().map(|&a| texture::alpha_byte(a)).collect();
        Self { drop, alpha, texture: Vec::new() }
    }

    pub fn raindrop(&self) -> &Raindrop { &self.drop }
}

/// Drop the alpha channel of a tightly packed RGBA buffer.
fn rgb_from_rgba(rgba: &[u8], w: u32, h: u32) -> DropResult<RgbImage> {
    let expected = w as usize * h as usize * 4;
    if rgba.len() != expected {
        return Err(DropError::BufferSize { expected, got: rgba.len() });
    }
    let img = RgbaImage::from_raw(w, h, rgba.to_vec())
        .ok_or(DropError::BufferSize { expected, got: rgba.len() })?;
    Ok(DynamicImage::ImageRgba8(img).to_rgb8())
}
