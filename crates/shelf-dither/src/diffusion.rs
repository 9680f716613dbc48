//! Floyd-Steinberg error diffusion onto a four-tone palette.

use crate::{luminance, Palette, PixelBuffer};

/// Neighbor offsets `(dx, dy)` and weights out of 16.
const WEIGHTS: [(i64, i64, f32); 4] = [(1, 0, 7.0), (-1, 1, 3.0), (0, 1, 5.0), (1, 1, 1.0)];

/// Quantize `pixels` onto `palette`, diffusing each pixel's error to its
/// unvisited neighbors. Pixels are visited row-major, so later pixels see
/// already-corrected values. Corrected values are stored as clamped bytes,
/// rounded half to even, so fractional error is dropped at every write.
/// Alpha is copied unchanged.
pub fn floyd_steinberg(pixels: &PixelBuffer, palette: &Palette) -> PixelBuffer {
    let width = pixels.width() as usize;
    let height = pixels.height() as usize;

    let mut work: Vec<[u8; 3]> = pixels
        .as_bytes()
        .chunks_exact(4)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let mut out = pixels.clone();

    for y in 0..height {
        for x in 0..width {
            let current = work[y * width + x].map(f32::from);
            let tone = palette.tone_for(luminance(current[0], current[1], current[2]));

            let error = [
                current[0] - tone[0] as f32,
                current[1] - tone[1] as f32,
                current[2] - tone[2] as f32,
            ];

            let alpha = pixels.pixel(x as u32, y as u32)[3];
            out.put_pixel(x as u32, y as u32, [tone[0], tone[1], tone[2], alpha]);

            for (dx, dy, weight) in WEIGHTS {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let neighbor = &mut work[ny as usize * width + nx as usize];
                for c in 0..3 {
                    neighbor[c] = clamp_byte(f32::from(neighbor[c]) + error[c] * weight / 16.0);
                }
            }
        }
    }

    out
}

fn clamp_byte(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round_ties_even() as u8
}
