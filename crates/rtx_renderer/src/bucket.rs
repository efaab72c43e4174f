//! Bucket-based tile scheduling.
//!
//! Divides the image into tiles (buckets) that are traced independently in
//! parallel, centre first, and then copied into the frame.

use crate::renderer::FrameContext;
use crate::PixelBuffer;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket edge in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Cover a `width` x `height` image with buckets, nearest the centre first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from the image centre.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |b: &Bucket| {
        let dx = b.x as f32 + b.width as f32 / 2.0 - center_x;
        let dy = b.y as f32 + b.height as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Trace every pixel of `bucket`.
pub(crate) fn render_bucket(bucket: &Bucket, frame: &FrameContext<'_>) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            pixels.push(frame.pixel(bucket.x + local_x, bucket.y + local_y));
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

/// Packed pixels of one traced bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Row-major within the bucket
    pub pixels: Vec<u32>,
}

impl BucketResult {
    /// Copy the bucket into its place in `buffer`.
    pub fn blit(&self, buffer: &mut PixelBuffer) {
        let b = &self.bucket;
        for (local_y, row) in self.pixels.chunks(b.width as usize).enumerate() {
            let start = buffer.index(b.x, b.y + local_y as u32);
            buffer.pixels[start..start + row.len()].copy_from_slice(row);
        }
    }
}
