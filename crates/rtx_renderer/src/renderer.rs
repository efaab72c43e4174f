//! Frame rendering.
//!
//! [`trace`] fills a caller-owned [`PixelBuffer`] in parallel with rayon.
//! Every pixel owns its index in the buffer and its own random stream seeded
//! from [`TraceConfig::seed`], so a frame is identical however the work is
//! split across threads.

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{Camera, PixelBuffer, Tracer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rtx_core::{Scene, SceneError};
use rtx_math::{pack_rgb, unpack_rgb, Color};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors reported before any pixel is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("invalid trace config: {0}")]
    InvalidConfig(String),

    #[error("pixel buffer holds {actual} pixels, {expected} needed")]
    BufferSize { expected: usize, actual: usize },
}

/// How the pixels of a frame are handed out to worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum Scheduling {
    /// One task per row.
    #[default]
    Rows,
    /// Square tiles, centre first.
    Buckets { size: u32 },
    /// Trace every `step`-th pixel, then fill the gaps, reusing an anchor
    /// where the surrounding anchors differ by less than `threshold` per
    /// channel (0-255).
    Adaptive { step: u32, threshold: f32 },
}

/// Trace parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Maximum recursion depth, at least 1
    pub max_depth: u32,
    /// Seen by primary rays that hit nothing
    pub background: Color,
    /// Global light, scaled by each surface's diffuse factor
    pub ambient: Color,
    /// N for an N x N sub-pixel grid
    pub antialias: u32,
    /// Monte-Carlo samples at the primary bounce; 0 keeps the mirror path
    pub diffuse_samples: u32,
    /// Samples per volumetric light
    pub light_samples: u32,
    /// Phong exponent of the specular lobe
    pub shininess: f32,
    pub seed: u64,
    pub scheduling: Scheduling,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            background: Color::splat(20.0),
            ambient: Color::ZERO,
            antialias: 1,
            diffuse_samples: 16,
            light_samples: 4,
            shininess: 32.0,
            seed: 0,
            scheduling: Scheduling::Rows,
        }
    }
}

impl TraceConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: &str| Err(RenderError::InvalidConfig(msg.to_string()));

        if self.max_depth == 0 {
            return invalid("max_depth must be at least 1");
        }
        if self.antialias == 0 {
            return invalid("antialias must be at least 1");
        }
        if !(self.shininess.is_finite() && self.shininess >= 0.0) {
            return invalid("shininess must be a non-negative number");
        }
        match self.scheduling {
            Scheduling::Rows => {}
            Scheduling::Buckets { size } if size == 0 => return invalid("bucket size must be at least 1"),
            Scheduling::Buckets { .. } => {}
            Scheduling::Adaptive { step, .. } if step < 2 => return invalid("adaptive step must be at least 2"),
            Scheduling::Adaptive { threshold, .. } if !(threshold.is_finite() && threshold >= 0.0) => {
                return invalid("adaptive threshold must be a non-negative number")
            }
            Scheduling::Adaptive { .. } => {}
        }

        Ok(())
    }
}

/// Work done for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub pixels: usize,
    /// Pixels whose primary rays were cast
    pub traced: usize,
    /// Pixels copied from a neighbouring anchor
    pub reused: usize,
    pub elapsed: Duration,
}

/// Everything needed to compute one pixel.
pub(crate) struct FrameContext<'a> {
    tracer: Tracer<'a>,
    camera: &'a Camera,
    width: u32,
    height: u32,
    antialias: u32,
    seed: u64,
}

impl FrameContext<'_> {
    /// Packed color of pixel (x, y), row 0 at the top.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> u32 {
        let index = y as u64 * self.width as u64 + x as u64;
        let mut rng = StdRng::seed_from_u64(self.seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15));

        let n = self.antialias;
        let mut sum = Color::ZERO;
        for sy in 0..n {
            for sx in 0..n {
                let u = (x as f32 + (sx as f32 + 0.5) / n as f32) / self.width as f32;
                let v = 1.0 - (y as f32 + (sy as f32 + 0.5) / n as f32) / self.height as f32;
                sum += self.tracer.primary(&self.camera.ray(u, v), &mut rng);
            }
        }

        pack_rgb(sum / (n * n) as f32)
    }
}

/// Render one frame of `scene` as seen by `camera` into `buffer`.
///
/// The buffer's own dimensions are the image resolution.
pub fn trace(
    camera: &Camera,
    scene: &Scene,
    config: &TraceConfig,
    buffer: &mut PixelBuffer,
) -> Result<RenderStats, RenderError> {
    config.validate()?;
    let view = scene.view()?;

    let expected = buffer.width as usize * buffer.height as usize;
    if buffer.pixels.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    let start = Instant::now();
    let frame = FrameContext {
        tracer: Tracer::new(view, config),
        camera,
        width: buffer.width,
        height: buffer.height,
        antialias: config.antialias,
        seed: config.seed,
    };

    let mut stats = if expected == 0 {
        RenderStats::default()
    } else {
        match config.scheduling {
            Scheduling::Rows => render_rows(&frame, buffer),
            Scheduling::Buckets { size } => render_buckets(&frame, buffer, size),
            Scheduling::Adaptive { step, threshold } => render_adaptive(&frame, buffer, step, threshold),
        }
    };
    stats.elapsed = start.elapsed();

    log::debug!(
        "Traced {}x{} frame in {:.1?}: {} traced, {} reused",
        buffer.width,
        buffer.height,
        stats.elapsed,
        stats.traced,
        stats.reused
    );

    Ok(stats)
}

fn render_rows(frame: &FrameContext<'_>, buffer: &mut PixelBuffer) -> RenderStats {
    buffer
        .pixels
        .par_chunks_mut(frame.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = frame.pixel(x as u32, y as u32);
            }
        });

    let pixels = buffer.pixels.len();
    RenderStats {
        pixels,
        traced: pixels,
        ..RenderStats::default()
    }
}

fn render_buckets(frame: &FrameContext<'_>, buffer: &mut PixelBuffer, size: u32) -> RenderStats {
    let buckets = generate_buckets(frame.width, frame.height, size);

    let results: Vec<BucketResult> = buckets.par_iter().map(|b| render_bucket(b, frame)).collect();
    for result in &results {
        result.blit(buffer);
    }

    let pixels = buffer.pixels.len();
    RenderStats {
        pixels,
        traced: pixels,
        ..RenderStats::default()
    }
}

/// Coordinates `0, step, 2 step, ...` along an axis of `len` pixels, always
/// ending with the last pixel.
fn anchor_coords(len: u32, step: u32) -> Vec<u32> {
    let mut coords: Vec<u32> = (0..len).step_by(step as usize).collect();
    if coords.last() != Some(&(len - 1)) {
        coords.push(len - 1);
    }
    coords
}

/// The anchors on either side of `coord`, as indices into `coords`.
fn bracket(coords: &[u32], coord: u32, step: u32) -> (usize, usize) {
    let lower = (coord / step) as usize;
    if coords[lower] == coord {
        (lower, lower)
    } else if coords[lower + 1] == coord {
        // The last pixel, off the regular grid
        (lower + 1, lower + 1)
    } else {
        (lower, lower + 1)
    }
}

fn render_adaptive(frame: &FrameContext<'_>, buffer: &mut PixelBuffer, step: u32, threshold: f32) -> RenderStats {
    let xs = anchor_coords(frame.width, step);
    let ys = anchor_coords(frame.height, step);

    // Coarse pass
    let anchors: Vec<Vec<u32>> = ys
        .par_iter()
        .map(|&y| xs.iter().map(|&x| frame.pixel(x, y)).collect())
        .collect();

    let similar = |pixels: [u32; 4]| {
        let channels = pixels.map(unpack_rgb);
        (0..3).all(|c| {
            let values = channels.map(|p| p[c]);
            let spread = values.iter().max().copied().unwrap_or(0) - values.iter().min().copied().unwrap_or(0);
            (spread as f32) < threshold
        })
    };

    // Fill pass, each pixel written exactly once
    let (traced, reused) = buffer
        .pixels
        .par_chunks_mut(frame.width as usize)
        .enumerate()
        .map(|(y, row)| {
            let y = y as u32;
            let (y0, y1) = bracket(&ys, y, step);
            let ny = if y - ys[y0] <= ys[y1] - y { y0 } else { y1 };
            let mut counts = (0, 0);

            for (x, pixel) in row.iter_mut().enumerate() {
                let x = x as u32;
                let (x0, x1) = bracket(&xs, x, step);

                if y0 == y1 && x0 == x1 {
                    *pixel = anchors[y0][x0];
                    continue;
                }

                let corners = [anchors[y0][x0], anchors[y0][x1], anchors[y1][x0], anchors[y1][x1]];
                if similar(corners) {
                    let nx = if x - xs[x0] <= xs[x1] - x { x0 } else { x1 };
                    *pixel = anchors[ny][nx];
                    counts.1 += 1;
                } else {
                    *pixel = frame.pixel(x, y);
                    counts.0 += 1;
                }
            }
            counts
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    RenderStats {
        pixels: buffer.pixels.len(),
        traced: traced + xs.len() * ys.len(),
        reused,
        ..RenderStats::default()
    }
}
