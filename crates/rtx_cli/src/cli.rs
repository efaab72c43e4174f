use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rtx_renderer::{Scheduling, TraceConfig, DEFAULT_BUCKET_SIZE};
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Pixel scheduling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchedulingMode {
    Rows,
    Buckets,
    Adaptive,
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "rtx")]
#[command(about = "Renders the RTX demo scene on a background thread")]
pub struct Args {
    /// Image width in pixels (also the screen width in scene units)
    #[arg(long, default_value = "800")]
    pub width: u32,

    /// Image height in pixels (also the screen height in scene units)
    #[arg(long, default_value = "600")]
    pub height: u32,

    /// Frames to render before writing the output
    #[arg(long, short = 'n', default_value = "1")]
    pub frames: u32,

    /// Camera yaw applied between frames, in radians
    #[arg(long, default_value = "0.05")]
    pub yaw: f32,

    /// Where to write the last complete frame
    #[arg(long, short, default_value = "render.png")]
    pub output: PathBuf,

    /// JSON file with trace settings; flags below override it
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Maximum recursion depth
    #[arg(long, short)]
    pub depth: Option<u32>,

    /// Anti-aliasing grid size (N x N sub-pixels)
    #[arg(long, short)]
    pub antialias: Option<u32>,

    /// Monte-Carlo samples at the primary bounce
    #[arg(long)]
    pub diffuse_samples: Option<u32>,

    /// Random seed for diffuse and light sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pixel scheduling strategy
    #[arg(long, value_enum)]
    pub scheduling: Option<SchedulingMode>,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Defaults, then the JSON file, then command-line overrides.
    pub fn trace_config(&self) -> Result<TraceConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => TraceConfig::default(),
        };

        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(antialias) = self.antialias {
            config.antialias = antialias;
        }
        if let Some(samples) = self.diffuse_samples {
            config.diffuse_samples = samples;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(mode) = self.scheduling {
            config.scheduling = match mode {
                SchedulingMode::Rows => Scheduling::Rows,
                SchedulingMode::Buckets => Scheduling::Buckets {
                    size: DEFAULT_BUCKET_SIZE,
                },
                SchedulingMode::Adaptive => Scheduling::Adaptive {
                    step: 4,
                    threshold: 8.0,
                },
            };
        }

        config.validate()?;
        Ok(config)
    }
}
