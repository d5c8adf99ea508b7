//! Render driver: primary rays per pixel, bucketed and parallel.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use kiln_math::{Color, Interval};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{RaySource, RayTracer};

/// Errors raised by the render driver.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("image resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("render cancelled after {rendered} of {total} buckets")]
    Cancelled { rendered: usize, total: usize },

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Worker threads, 0 for rayon's default
    pub threads: usize,
    /// Seed for the per-bucket generators used by glossy sampling
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: 0,
            seed: 0,
        }
    }
}

/// Receives rendered pixels.
pub trait ImageSink {
    fn write_pixel(&mut self, x: u32, y: u32, color: Color);
}

/// Convert a color on the 0-255 scale to 8-bit RGBA, clamping each channel.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f64| Interval::new(0.0, 255.0).clamp(c.round()) as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// Row-major offset of `(x, y)`, computed in `usize` so large frames do not
/// wrap.
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Color of pixel `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[pixel_index(self.width, x, y)]
    }

    /// Overwrite pixel `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[pixel_index(self.width, x, y)] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgba(*c)).collect()
    }

    /// Paint every `interval`-th row and column with `color`.
    pub fn print_grid(&mut self, interval: u32, color: Color) {
        let interval = interval.max(1);
        for y in 0..self.height {
            for x in 0..self.width {
                if x % interval == 0 || y % interval == 0 {
                    self.set(x, y, color);
                }
            }
        }
    }
}

impl ImageSink for ImageBuffer {
    fn write_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.set(x, y, color);
    }
}

/// Trace the primary ray of pixel `(x, y)`.
pub fn render_pixel(
    camera: &dyn RaySource,
    tracer: &RayTracer<'_>,
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let ray = camera.ray_through_pixel(width, height, x, y);
    tracer.trace_ray(&ray, rng)
}

/// Render the whole image into a new buffer.
pub fn render(
    camera: &dyn RaySource,
    tracer: &RayTracer<'_>,
    width: u32,
    height: u32,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::new(width, height);
    render_into(&mut image, camera, tracer, width, height, config, cancel)?;
    Ok(image)
}

/// Render the whole image, writing every pixel to `sink`.
///
/// Buckets are traced in parallel, each with its own generator seeded from
/// `config.seed` and the bucket index, so output does not depend on thread
/// scheduling. Raising `cancel` stops all workers before their next pixel;
/// nothing is written to `sink` in that case.
pub fn render_into(
    sink: &mut dyn ImageSink,
    camera: &dyn RaySource,
    tracer: &RayTracer<'_>,
    width: u32,
    height: u32,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidResolution { width, height });
    }

    let buckets = generate_buckets(width, height, config.bucket_size);
    let total = buckets.len();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    info!(
        "Rendering {}x{} in {} buckets on {} threads",
        width,
        height,
        total,
        pool.current_num_threads()
    );

    let start = Instant::now();
    let done = AtomicUsize::new(0);
    let results: Vec<Option<BucketResult>> = pool.install(|| {
        buckets
            .par_iter()
            .map(|bucket| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(bucket.index as u64));
                let result = render_bucket(bucket, camera, tracer, (width, height), &mut rng, cancel)?;
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(
                    "Bucket {} done ({}/{}, {:.0}%)",
                    bucket.index,
                    finished,
                    total,
                    finished as f64 * 100.0 / total as f64
                );
                Some(result)
            })
            .collect()
    });

    let rendered = results.iter().flatten().count();
    if rendered < total {
        info!("Render cancelled after {} of {} buckets", rendered, total);
        return Err(RenderError::Cancelled { rendered, total });
    }

    for result in results.into_iter().flatten() {
        let b = result.bucket;
        for (i, color) in result.pixels.into_iter().enumerate() {
            let i = i as u32;
            sink.write_pixel(b.x + i % b.width, b.y + i / b.width, color);
        }
    }

    info!("Render finished in {:.2?}", start.elapsed());
    Ok(())
}
