//! RTX renderer - recursive CPU ray tracing.
//!
//! [`trace`] renders a built [`Scene`](rtx_core::Scene) through a [`Camera`]
//! into a [`PixelBuffer`], spreading pixels over rayon's thread pool.
//! [`FrameExchange`] and [`SharedCamera`] carry frames and camera state
//! between a render thread and the rest of an application.

mod bucket;
mod camera;
mod frame;
mod renderer;
mod tracer;

pub use bucket::{generate_buckets, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use frame::{FrameExchange, PixelBuffer, SharedCamera};
pub use renderer::{trace, RenderError, RenderStats, Scheduling, TraceConfig};
pub use tracer::{Shadow, Tracer};
