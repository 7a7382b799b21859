// export.rs - Write a drop's rasters and metadata to disk

use image::{GrayImage, ImageResult, Luma};
use ndarray::Array2;
use raindrop_synth::texture::alpha_byte;
use raindrop_synth::Raindrop;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// label.png, alpha.png and, if textured, texture.png.
pub fn write_rasters(dir: &Path, drop: &Raindrop) -> ImageResult<()> {
    let label = to_gray(drop.label_map(), |v| if v > 0 { 255 } else { 0 });
    let path = dir.join("label.png");
    label.save(&path)?;
    println!("  Wrote {}", path.display());

    let alpha = to_gray(drop.alpha_map(), alpha_byte);
    let path = dir.join("alpha.png");
    alpha.save(&path)?;
    println!("  Wrote {}", path.display());

    if let Some(texture) = drop.texture() {
        let path = dir.join("texture.png");
        texture.save(&path)?;
        println!("  Wrote {}", path.display());
    }
    Ok(())
}

/// Plain `key = value` summary for the compositor.
pub fn write_meta(path: &Path, drop: &Raindrop) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    let (rows, cols) = drop.canvas_dim();

    writeln!(f, "key = {}", drop.key())?;
    writeln!(f, "center = [{}, {}]", drop.center().0, drop.center().1)?;
    writeln!(f, "radius = {}", drop.radius())?;
    writeln!(f, "vertical_radius = {}", drop.vertical_radius())?;
    if let Some(range) = drop.radius_range() {
        writeln!(f, "radius_range = [{}, {}]", range.lo(), range.hi())?;
    }
    writeln!(f, "width = {}", cols)?;
    writeln!(f, "height = {}", rows)?;
    writeln!(f, "textured = {}", drop.texture().is_some())?;
    f.flush()?;

    println!("  Wrote {}", path.display());
    Ok(())
}

fn to_gray<T: Copy>(data: &Array2<T>, map: impl Fn(T) -> u8) -> GrayImage {
    let (rows, cols) = data.dim();
    GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        Luma([map(data[[y as usize, x as usize]])])
    })
}
