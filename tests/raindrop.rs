//! End-to-end checks of the drop record through the public API.
//!
//! Covered:
//! 1. Fixed-radius and sampled construction, canvas shape and lobe bounds.
//! 2. Label containment and alpha normalization for a spread of radii.
//! 3. Ingested construction from external masks.
//! 4. Texturing: determinism, size, flip, and the small-background guard.
//! 5. Collision bookkeeping.

use image::{Rgb, RgbImage};
use ndarray::Array2;
use raindrop_synth::{
    DropError, DropKind, DropSize, RadiusRange, Raindrop, RaindropConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn scene(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x * 3 % 256) as u8, (y * 2 % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn generate(size: DropSize, seed: u64) -> Raindrop {
    let mut rng = StdRng::seed_from_u64(seed);
    Raindrop::generate(1, (0.0, 0.0), size, DropKind::Default, &RaindropConfig::default(), &mut rng)
        .unwrap()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn fixed_radius_scenario() {
    let drop = Raindrop::new(1, (50.0, 50.0), 20).unwrap();
    assert_eq!(drop.key(), 1);
    assert_eq!(drop.center(), (50.0, 50.0));
    assert_eq!(drop.radius(), 20);
    assert_eq!(drop.label_map().dim(), (100, 80));
    assert_eq!(drop.vertical_radius(), 20);
    assert_eq!(drop.kind(), DropKind::Default);
    assert!(!drop.use_label());
}

#[test]
fn single_value_range_scenario() {
    let drop = generate(DropSize::Sampled(RadiusRange::new(10, 10).unwrap()), 99);
    assert_eq!(drop.radius(), 10);
    assert_eq!(drop.label_map().dim(), (50, 40));
}

#[test]
fn lobe_bounds_hold_across_range() {
    let range = RadiusRange::new(5, 30).unwrap();
    for radius in 5..=30 {
        let drop = generate(DropSize::Within { radius, range }, 0);
        let v = drop.vertical_radius();
        assert!(v >= radius, "r={radius} v={v}");
        assert!(v as f64 <= 2.4 * radius as f64, "r={radius} v={v}");
    }
}

#[test]
fn largest_radius_in_range_has_tallest_lobe() {
    let range = RadiusRange::new(10, 40).unwrap();
    let small = generate(DropSize::Within { radius: 10, range }, 0);
    let large = generate(DropSize::Within { radius: 40, range }, 0);
    assert_eq!(small.vertical_radius(), 10);
    // 0.8 * sqrt(3) * 40 = 55.4
    assert_eq!(large.vertical_radius(), 55);
}

#[test]
fn unusable_range_is_rejected() {
    assert_eq!(RadiusRange::new(12, 4), Err(DropError::InvalidRange { lo: 12, hi: 4 }));
}

#[test]
fn seeded_sampling_is_reproducible() {
    let range = RadiusRange::new(3, 50).unwrap();
    let a = generate(DropSize::Sampled(range), 1234);
    let b = generate(DropSize::Sampled(range), 1234);
    assert_eq!(a.radius(), b.radius());
    assert_eq!(a.label_map(), b.label_map());
}

// ── Shape properties ──────────────────────────────────────────────────────────

#[test]
fn label_is_binary_and_contained() {
    let range = RadiusRange::new(4, 24).unwrap();
    for radius in [4u32, 9, 16, 24] {
        let drop = generate(DropSize::Within { radius, range }, 0);
        let (cx, cy) = (2.0 * radius as f64, 3.0 * radius as f64);
        let bound = radius.max(drop.vertical_radius()) as f64;

        for ((y, x), &v) in drop.label_map().indexed_iter() {
            assert!(v <= 1);
            if v == 1 {
                let d = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
                assert!(d <= bound, "r={radius}: ({y}, {x}) at {d} > {bound}");
            }
        }
    }
}

#[test]
fn alpha_is_normalized() {
    for radius in [3u32, 8, 20] {
        let drop = Raindrop::new(1, (0.0, 0.0), radius).unwrap();
        let alpha = drop.alpha_map();
        assert_eq!(alpha.dim(), drop.label_map().dim());
        assert!(alpha.iter().all(|&a| (0.0..=255.0).contains(&a)));
        let max = alpha.iter().cloned().fold(0.0f32, f32::max);
        assert_eq!(max, 255.0, "r={radius}");
    }
}

// ── Ingested path ─────────────────────────────────────────────────────────────

#[test]
fn ingested_scenario() {
    // 40 rows x 60 cols
    let label = Array2::<u8>::zeros((40, 60));
    let alpha = Array2::<f32>::zeros((40, 60));
    let drop = Raindrop::from_label(5, (10.0, 20.0), label, alpha).unwrap();
    assert_eq!(drop.radius(), 10);
    assert_eq!(drop.vertical_radius(), (1.3 * 3f64.sqrt() * 10.0).round() as u32);
    assert!(drop.use_label());
    assert_eq!(drop.label_map().dim(), (40, 60));
}

#[test]
fn ingested_drop_can_carry_splash_kind_and_texture() {
    let label = Array2::<u8>::ones((48, 40));
    let alpha = Array2::<f32>::from_elem((48, 40), 200.0);
    let mut drop = Raindrop::from_label(2, (0.0, 0.0), label, alpha)
        .unwrap()
        .with_kind(DropKind::Splash);
    assert_eq!(drop.kind(), DropKind::Splash);
    drop.update_texture(&scene(40, 48)).unwrap();
    let texture = drop.texture().unwrap();
    assert_eq!(texture.dimensions(), (40, 48));
    assert!(texture.pixels().all(|p| p.0[3] == 200));
}

// ── Texture ───────────────────────────────────────────────────────────────────

#[test]
fn texture_is_deterministic_and_sized() {
    let mut drop = Raindrop::new(3, (100.0, 80.0), 12).unwrap();
    let bg = scene(48, 60);

    drop.update_texture(&bg).unwrap();
    let first = drop.texture().cloned().unwrap();
    drop.update_texture(&bg).unwrap();
    let second = drop.texture().cloned().unwrap();

    assert_eq!(first.dimensions(), (48, 60));
    assert_eq!(first, second);
}

#[test]
fn texture_alpha_is_vertically_flipped_matte() {
    let mut drop = Raindrop::new(3, (0.0, 0.0), 10).unwrap();
    drop.update_texture(&scene(40, 50)).unwrap();
    let texture = drop.texture().unwrap();
    let alpha = drop.alpha_map();

    for y in 0..50usize {
        for x in [5usize, 20, 33] {
            let expected = alpha[[49 - y, x]] as u8;
            assert_eq!(texture.get_pixel(x as u32, y as u32).0[3], expected);
        }
    }
}

#[test]
fn small_background_fails_fast() {
    let mut drop = Raindrop::new(3, (0.0, 0.0), 10).unwrap();
    let err = drop.update_texture(&scene(40, 49)).unwrap_err();
    assert_eq!(err, DropError::BackgroundTooSmall { needed: (40, 50), got: (40, 49) });
    assert!(drop.texture().is_none());
    assert!(drop.background().is_none());
}

#[test]
fn custom_config_changes_texture() {
    let bg = scene(40, 50);
    let mut plain = Raindrop::new(1, (0.0, 0.0), 10).unwrap();
    let cfg = RaindropConfig::from_toml_str("magnification = 0.5").unwrap();
    let mut wide = Raindrop::new(1, (0.0, 0.0), 10).unwrap().with_config(cfg);

    plain.update_texture(&bg).unwrap();
    wide.update_texture(&bg).unwrap();
    assert_ne!(plain.texture(), wide.texture());
    // Alpha comes from the same matte
    assert_eq!(
        plain.texture().unwrap().pixels().map(|p| p.0[3]).collect::<Vec<_>>(),
        wide.texture().unwrap().pixels().map(|p| p.0[3]).collect::<Vec<_>>()
    );
}

// ── Collision bookkeeping ─────────────────────────────────────────────────────

#[test]
fn collision_scenario() {
    let mut drop = Raindrop::new(1, (50.0, 50.0), 20).unwrap();
    drop.set_collision(true, vec![2, 3]);
    assert!(drop.collided());
    assert_eq!(drop.collision_list(), &[2, 3]);

    drop.set_collision(false, vec![]);
    assert!(!drop.collided());
    assert!(drop.collision_list().is_empty());
}

#[test]
fn drops_are_independent_across_threads() {
    let handles: Vec<_> = (1..=4u32)
        .map(|r| std::thread::spawn(move || Raindrop::new(r, (0.0, 0.0), r * 3).unwrap()))
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        let drop = h.join().unwrap();
        let r = (i as u32 + 1) * 3;
        assert_eq!(drop.radius(), r);
        assert_eq!(drop.label_map().dim(), (5 * r as usize, 4 * r as usize));
    }
}
