//! RTX harness - renders the demo scene headlessly.
//!
//! A dedicated render thread traces frames from camera snapshots and
//! publishes them; the main thread plays the input side, turning the camera
//! once per published frame, and finally writes the latest frame to disk.

mod cli;
mod demo;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::Args;
use rtx_core::Scene;
use rtx_renderer::{trace, FrameExchange, PixelBuffer, SharedCamera, TraceConfig};
use std::thread;
use std::time::Duration;

/// Render `frames` frames, each from a fresh camera snapshot.
fn render_loop(
    scene: &Scene,
    config: &TraceConfig,
    camera: &SharedCamera,
    exchange: &FrameExchange,
    (width, height): (u32, u32),
    frames: u32,
) -> Result<()> {
    let mut buffer = PixelBuffer::new(width, height);

    for frame in 1..=frames {
        let snapshot = camera.snapshot();
        let stats = trace(&snapshot, scene, config, &mut buffer)?;
        buffer = exchange.publish(buffer);

        log::info!(
            "Frame {}/{} in {:.2?} ({} traced, {} reused)",
            frame,
            frames,
            stats.elapsed,
            stats.traced,
            stats.reused
        );
    }

    Ok(())
}

fn save_frame(frame: &PixelBuffer, args: &Args) -> Result<()> {
    let image = image::RgbImage::from_raw(frame.width, frame.height, frame.to_rgb8())
        .context("frame does not match its dimensions")?;
    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!("Wrote {}", args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let config = args.trace_config()?;
    log::info!(
        "Rendering {}x{}, depth {}, {}x{} anti-aliasing, {:?}",
        args.width,
        args.height,
        config.max_depth,
        config.antialias,
        config.antialias,
        config.scheduling
    );

    let scene = demo::build_scene();
    let camera = SharedCamera::new(demo::camera(args.width, args.height));
    let exchange = FrameExchange::new(args.width, args.height);
    let frames = args.frames.max(1);

    thread::scope(|s| {
        let renderer = s.spawn(|| {
            render_loop(&scene, &config, &camera, &exchange, (args.width, args.height), frames)
        });

        // Input side: one yaw step per published frame
        let mut seen = 0;
        while !renderer.is_finished() {
            let published = exchange.frame_count();
            if published > seen {
                seen = published;
                camera.update(|c| c.turn_horizontal(args.yaw));
            }
            thread::sleep(Duration::from_millis(5));
        }

        renderer.join().map_err(|_| anyhow!("render thread panicked"))?
    })?;

    save_frame(&exchange.latest(), &args)
}
