//! Frame handoff between the render thread and its readers.
//!
//! The renderer writes into a [`PixelBuffer`] it owns exclusively, then
//! publishes it to a [`FrameExchange`]. Readers clone the `Arc` of the latest
//! complete frame, so they can see a stale frame but never a torn one. The
//! camera travels the other way through a [`SharedCamera`] snapshot.

use crate::Camera;
use rtx_math::unpack_rgb;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Row-major packed `0xRRGGBB` pixels, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Offset of (x, y) in `pixels`.
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, pixel: u32) {
        let index = self.index(x, y);
        self.pixels[index] = pixel;
    }

    /// Unpacked RGB bytes, ready for an image encoder.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| unpack_rgb(p)).collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Critical sections only swap plain values, a panic can't leave them half-written
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The most recent complete frame.
#[derive(Debug)]
pub struct FrameExchange {
    latest: Mutex<Arc<PixelBuffer>>,
    frame: AtomicU64,
}

impl FrameExchange {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            latest: Mutex::new(Arc::new(PixelBuffer::new(width, height))),
            frame: AtomicU64::new(0),
        }
    }

    /// Make `buffer` the latest frame.
    ///
    /// Returns a buffer for the next frame: the previous one when no reader
    /// still holds it, otherwise a fresh copy of it.
    pub fn publish(&self, buffer: PixelBuffer) -> PixelBuffer {
        let previous = std::mem::replace(&mut *lock(&self.latest), Arc::new(buffer));
        self.frame.fetch_add(1, Ordering::Release);
        Arc::try_unwrap(previous).unwrap_or_else(|shared| (*shared).clone())
    }

    /// The latest complete frame.
    pub fn latest(&self) -> Arc<PixelBuffer> {
        Arc::clone(&lock(&self.latest))
    }

    /// Number of frames published so far.
    pub fn frame_count(&self) -> u64 {
        self.frame.load(Ordering::Acquire)
    }
}

/// Camera state written by the input side and snapshotted per frame.
#[derive(Debug, Default)]
pub struct SharedCamera {
    camera: Mutex<Camera>,
}

impl SharedCamera {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera: Mutex::new(camera),
        }
    }

    pub fn publish(&self, camera: Camera) {
        *lock(&self.camera) = camera;
    }

    /// Apply a navigation step in place.
    pub fn update(&self, f: impl FnOnce(&mut Camera)) {
        f(&mut lock(&self.camera));
    }

    /// A copy that stays fixed for the whole frame.
    pub fn snapshot(&self) -> Camera {
        *lock(&self.camera)
    }
}
