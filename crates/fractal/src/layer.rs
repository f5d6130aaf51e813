//! Escape-time iteration rendered into square RGBA8 intensity grids.
//!
//! The red channel carries the scaled escape count (interior points read
//! 255), which is what the mesher thresholds into strata. Keeping the full
//! RGBA layout means a layer round-trips through PNG unchanged.

use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba};

pub const CHANNELS: usize = 4;

/// Square RGBA8 grid holding one rendered fractal.
#[derive(Clone, Debug)]
pub struct Layer {
    pub dimension: usize,
    pub pixels: Vec<u8>,
}

impl Layer {
    /// Julia set for the constant `c`, sampled over re/im in [-1.5, 1.5].
    pub fn julia(dimension: usize, c_re: f64, c_im: f64, max_iter: u32) -> Self {
        log::info!("Rendering Julia layer: dim={dimension}, c=({c_re}, {c_im}), iters={max_iter}");
        Self::render(dimension, -1.5, 1.5, -1.5, 1.5, |re, im| {
            escape_count(re, im, c_re, c_im, max_iter)
        })
    }

    /// Mandelbrot set sampled over re in [-2, 1], im in [-1.5, 1.5].
    pub fn mandelbrot(dimension: usize, max_iter: u32) -> Self {
        log::info!("Rendering Mandelbrot layer: dim={dimension}, iters={max_iter}");
        Self::render(dimension, -2.0, 1.0, -1.5, 1.5, |re, im| {
            escape_count(0.0, 0.0, re, im, max_iter)
        })
    }

    fn render(
        dimension: usize,
        re_min: f64,
        re_max: f64,
        im_min: f64,
        im_max: f64,
        escape: impl Fn(f64, f64) -> Escape,
    ) -> Self {
        let mut pixels = Vec::with_capacity(dimension * dimension * CHANNELS);
        for row in 0..dimension {
            for col in 0..dimension {
                let re = re_min + (re_max - re_min) * ((col as f64 + 0.5) / dimension as f64);
                let im = im_min + (im_max - im_min) * ((row as f64 + 0.5) / dimension as f64);
                let intensity = escape(re, im).intensity();
                pixels.extend_from_slice(&[intensity, 0, 0, 255]);
            }
        }
        Self { dimension, pixels }
    }

    /// Red-channel intensity of the pixel at (row, col).
    pub fn intensity(&self, row: usize, col: usize) -> u8 {
        self.pixels[(row * self.dimension + col) * CHANNELS]
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let side = self.dimension as u32;
        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(side, side, self.pixels.clone())
                .context("Layer pixel buffer does not match its dimension")?;
        img.save(path)
            .with_context(|| format!("Failed to write layer PNG: {}", path.display()))?;
        log::info!("Wrote layer PNG: {} ({side}x{side})", path.display());
        Ok(())
    }

    pub fn load_png(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("Failed to open layer PNG: {}", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        anyhow::ensure!(
            width == height,
            "Layer PNG must be square, got {width}x{height}"
        );
        log::info!("Loaded layer PNG: {} ({width}x{height})", path.display());
        Ok(Self {
            dimension: width as usize,
            pixels: rgba.into_raw(),
        })
    }
}

/// Outcome of iterating one sample of z = z^2 + c.
enum Escape {
    /// Left the radius-2 disc after this many iterations.
    After(u32, u32),
    /// Still bounded at the iteration cap.
    Interior,
}

impl Escape {
    fn intensity(&self) -> u8 {
        match *self {
            Escape::Interior => 255,
            Escape::After(n, max_iter) => ((255 * n) / max_iter.max(1)) as u8,
        }
    }
}

fn escape_count(mut z_re: f64, mut z_im: f64, c_re: f64, c_im: f64, max_iter: u32) -> Escape {
    for i in 0..max_iter {
        if z_re * z_re + z_im * z_im > 4.0 {
            return Escape::After(i, max_iter);
        }
        let re = z_re * z_re - z_im * z_im + c_re;
        z_im = 2.0 * z_re * z_im + c_im;
        z_re = re;
    }
    Escape::Interior
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn julia_origin_is_interior_for_c_zero() {
        // z = z^2 with |z| < 1 never escapes; the center sample is z = 0.
        let layer = Layer::julia(3, 0.0, 0.0, 50);
        assert_eq!(layer.intensity(1, 1), 255);
        // The corner samples at (±1, ±1) escape after two iterations:
        // 255 * 2 / 50 = 10.
        assert_eq!(layer.intensity(0, 0), 10);
        assert_eq!(layer.intensity(2, 2), 10);
    }

    #[test]
    fn mandelbrot_center_column_is_interior() {
        // dim 3 puts the middle sample at c = (-0.5, 0), inside the set.
        let layer = Layer::mandelbrot(3, 100);
        assert_eq!(layer.intensity(1, 1), 255);
    }

    #[test]
    fn layers_are_fully_populated_rgba() {
        let layer = Layer::julia(8, -0.76, 0.15, 30);
        assert_eq!(layer.pixels.len(), 8 * 8 * CHANNELS);
        // Alpha stays opaque.
        assert!(layer.pixels.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn escape_intensities_scale_with_iteration_count() {
        let fast = escape_count(3.0, 0.0, 0.0, 0.0, 10).intensity();
        let never = escape_count(0.1, 0.0, 0.0, 0.0, 10).intensity();
        assert_eq!(fast, 0);
        assert_eq!(never, 255);
    }
}
