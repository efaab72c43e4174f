use glam::Vec3;

/// RGB radiance, unbounded while accumulating; 0-255 is the display range.
pub type Color = Vec3;

/// Quantize to a packed `0x00RRGGBB` pixel.
///
/// Each channel is clamped to `[0, 255]` on its own, so overexposed or negative
/// radiance is clipped rather than rejected.
pub fn pack_rgb(color: Color) -> u32 {
    let r = color.x.clamp(0.0, 255.0) as u32;
    let g = color.y.clamp(0.0, 255.0) as u32;
    let b = color.z.clamp(0.0, 255.0) as u32;
    (r << 16) | (g << 8) | b
}

/// Split a packed pixel back into its channels.
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}
