// dropgen - Render a single raindrop sprite over a background image
//
// Pipeline:
//   1. Load background
//   2. Generate the drop (fixed radius or sampled from a range)
//   3. Crop the patch under the drop and synthesize its texture
//   4. Export label / alpha / texture PNGs and a metadata file
//
// Usage: cargo run --bin dropgen -- <image> [--radius N | --range LO HI]
//        [--seed N] [--x N] [--y N] [--config FILE] [--out DIR]

mod export;

use image::imageops;
use rand::rngs::StdRng;
use rand::SeedableRng;
use raindrop_synth::{DropKind, DropSize, RadiusRange, Raindrop, RaindropConfig};
use std::env;
use std::error::Error;
use std::path::PathBuf;

const DEFAULT_RANGE: (u32, u32) = (10, 40);

struct Args {
    image: String,
    radius: Option<u32>,
    range: Option<(u32, u32)>,
    seed: Option<u64>,
    x: u32,
    y: u32,
    config: Option<PathBuf>,
    out: PathBuf,
}

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args {
        image: args[1].clone(),
        radius: None,
        range: None,
        seed: None,
        x: 0,
        y: 0,
        config: None,
        out: PathBuf::from("."),
    };

    let num = |i: usize| args.get(i).and_then(|s| s.parse().ok());

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--radius" => { parsed.radius = num(i + 1); i += 2; }
            "--range" => {
                parsed.range = num(i + 1).zip(num(i + 2));
                i += 3;
            }
            "--seed" => { parsed.seed = args.get(i + 1).and_then(|s| s.parse().ok()); i += 2; }
            "--x" => { parsed.x = num(i + 1).unwrap_or(0); i += 2; }
            "--y" => { parsed.y = num(i + 1).unwrap_or(0); i += 2; }
            "--config" => { parsed.config = args.get(i + 1).map(PathBuf::from); i += 2; }
            "--out" => { parsed.out = args.get(i + 1).map_or_else(|| PathBuf::from("."), PathBuf::from); i += 2; }
            _ => i += 1,
        }
    }
    parsed
}

/// Top-left corner of the patch that puts the drop head, at canvas (2r, 3r), on `(x, y)`.
fn patch_origin(x: u32, y: u32, radius: u32) -> (u32, u32) {
    (x.saturating_sub(2 * radius), y.saturating_sub(3 * radius))
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => {
            println!("  Loading config {}", path.display());
            RaindropConfig::load(path)?
        }
        None => RaindropConfig::default(),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let size = match (args.radius, args.range) {
        (Some(radius), Some((lo, hi))) => DropSize::Within { radius, range: RadiusRange::new(lo, hi)? },
        (Some(radius), None) => DropSize::Radius(radius),
        (None, range) => {
            let (lo, hi) = range.unwrap_or(DEFAULT_RANGE);
            DropSize::Sampled(RadiusRange::new(lo, hi)?)
        }
    };

    println!("  Loading background...");
    let background = image::open(&args.image)?.to_rgb8();

    let center = (args.x as f32, args.y as f32);
    let mut drop = Raindrop::generate(0, center, size, DropKind::Default, &config, &mut rng)?;
    println!(
        "  Drop: radius {} (lobe {}), canvas {:?}",
        drop.radius(),
        drop.vertical_radius(),
        drop.canvas_dim()
    );

    let (rows, cols) = drop.canvas_dim();
    let (left, top) = patch_origin(args.x, args.y, drop.radius());
    let patch = imageops::crop_imm(&background, left, top, cols as u32, rows as u32).to_image();

    println!("  Synthesizing texture...");
    drop.update_texture(&patch)?;

    std::fs::create_dir_all(&args.out)?;
    export::write_rasters(&args.out, &drop)?;
    export::write_meta(&args.out.join("drop.toml"), &drop)?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <image> [--radius N | --range LO HI] [--seed N] [--x N] [--y N] [--config FILE] [--out DIR]",
            args[0]
        );
        std::process::exit(1);
    }

    let args = parse_args(&args);
    println!("Rendering drop over {}...", args.image);

    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    println!("Done!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_centers_head_on_request() {
        assert_eq!(patch_origin(100, 120, 10), (80, 90));
    }

    #[test]
    fn patch_origin_saturates_at_edges() {
        assert_eq!(patch_origin(5, 200, 10), (0, 170));
        assert_eq!(patch_origin(0, 0, 1), (0, 0));
    }
}
