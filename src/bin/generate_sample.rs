use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::{ImageBuffer, Luma, Rgb};

/// Write a synthetic capture folder of `<ts>_image.jpg` / `<ts>_depth.tiff` pairs.
#[derive(Parser, Debug)]
struct Args {
    /// Output folder (created if missing)
    #[arg(default_value = "sample_captures")]
    out_dir: PathBuf,

    /// Number of pairs to write
    #[arg(short = 'n', long, default_value_t = 12)]
    count: u32,

    /// Depth image width; height is 3/4 of it and RGB is twice the size
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// First timestamp in seconds
    #[arg(long, default_value_t = 1_747_910_207.067_782)]
    start: f64,
}

/// Minimal deterministic PRNG (xorshift64*)
struct Noise(u64);

impl Noise {
    fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        (self.0.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Depth in millimetres: a tilted floor with a sphere drifting across it.
fn depth_at(x: f64, y: f64, phase: f64, noise: &mut Noise) -> u16 {
    let floor = 1500.0 + 2500.0 * (1.0 - y);
    let (cx, cy, r) = (0.2 + 0.6 * phase, 0.5, 0.18);
    let d2 = (x - cx).powi(2) + (y - cy).powi(2);
    let surface = if d2 < r * r {
        floor.min(900.0 - 600.0 * (r * r - d2).sqrt() / r)
    } else {
        floor
    };
    (surface + (noise.next_f64() - 0.5) * 12.0).clamp(0.0, u16::MAX as f64) as u16
}

fn main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let (w, h) = (args.width.max(4), args.width.max(4) * 3 / 4);
    let mut noise = Noise(0x9E37_79B9_7F4A_7C15);

    for i in 0..args.count {
        let ts = format!("{:.6}", args.start + i as f64 * 0.1);
        let phase = i as f64 / args.count.max(2).saturating_sub(1) as f64;

        let depth: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(w, h, |x, y| {
            Luma([depth_at(
                x as f64 / w as f64,
                y as f64 / h as f64,
                phase,
                &mut noise,
            )])
        });
        let depth_path = args.out_dir.join(format!("{ts}_depth.tiff"));
        depth
            .save(&depth_path)
            .with_context(|| format!("writing {}", depth_path.display()))?;

        let rgb: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(w * 2, h * 2, |x, y| {
            let d = depth.get_pixel(x / 2, y / 2)[0] as f64;
            let shade = (255.0 * (1.0 - d / 4000.0)).clamp(0.0, 255.0) as u8;
            Rgb([shade, (x * 255 / (w * 2)) as u8, (y * 255 / (h * 2)) as u8])
        });
        let rgb_path = args.out_dir.join(format!("{ts}_image.jpg"));
        rgb.save(&rgb_path)
            .with_context(|| format!("writing {}", rgb_path.display()))?;
    }

    // Files the curator must skip: an RGB frame without depth and a
    // non-timestamp name.
    let orphan_ts = args.start + args.count as f64 * 0.1;
    let orphan: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(w, h, Rgb([90, 90, 90]));
    orphan
        .save(args.out_dir.join(format!("{orphan_ts:.6}_image.jpg")))
        .context("writing orphan RGB frame")?;
    orphan
        .save(args.out_dir.join("preview_image.jpg"))
        .context("writing preview image")?;

    println!(
        "Wrote {} RGB/depth pairs ({w}x{h} depth) to {}",
        args.count,
        args.out_dir.display()
    );
    Ok(())
}
