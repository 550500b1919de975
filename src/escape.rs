//! The escape-time kernel.
//!
//! Every pixel is mapped to a point `c` on the complex plane and the
//! sequence z ← z² + c is iterated from zero.  Points whose orbit
//! leaves the circle of radius 2 escape; the iteration on which they do
//! so becomes the pixel's gray value.  Points that survive the whole
//! iteration budget are taken to be in the set and are painted black.
//!
//! Nothing here holds mutable state, so an `Evaluator` can be shared
//! by reference between any number of threads, and every pixel can be
//! computed independently of every other.

use itertools::iproduct;
use num::{clamp, Complex};

use crate::config::Config;
use crate::error::Result;
use crate::planes::{Pixel, PlaneMapper};

/// Squared escape radius.
pub const ESCAPE: f64 = 4.0;

/// Iterate z ← z² + c up to `limit` times.  Returns the 1-based
/// iteration on which |z|² first exceeded the escape radius, or `None`
/// if it never did.
#[inline]
pub fn escape_time(c: Complex<f64>, limit: usize) -> Option<usize> {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for i in 0..limit {
        z = z * z + c;
        if z.norm_sqr() > ESCAPE {
            return Some(i + 1);
        }
    }
    None
}

/// Turn an escape time into a gray value.  Interior points are 0;
/// escaping points are scaled onto 1..=max_color so that none of them
/// can be mistaken for the interior.
#[inline]
pub fn intensity(escape: Option<usize>, limit: usize, max_color: usize) -> u8 {
    match escape {
        None => 0,
        Some(n) => clamp(n * max_color / limit, 1, max_color) as u8,
    }
}

/// The per-pixel kernel: a plane mapping plus the iteration budget and
/// the gray depth.
#[derive(Copy, Clone, Debug)]
pub struct Evaluator {
    plane: PlaneMapper,
    limit: usize,
    max_color: usize,
}

impl Evaluator {
    /// Build the kernel for a configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Evaluator {
            plane: PlaneMapper::from_config(config)?,
            limit: config.limit(),
            max_color: config.max_color(),
        })
    }

    /// Width of a row in pixels.
    pub fn width(&self) -> usize {
        self.plane.integral_plane.0
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.plane.integral_plane.1
    }

    /// Gray value of one pixel.
    #[inline]
    pub fn evaluate(&self, pixel: Pixel) -> u8 {
        let c = self.plane.pixel_to_point(&pixel);
        intensity(escape_time(c, self.limit), self.limit, self.max_color)
    }

    /// Fill `rows`, a whole number of rows starting at row `top`.
    pub fn render_rows(&self, top: usize, rows: &mut [u8]) {
        let width = self.width();
        debug_assert_eq!(rows.len() % width, 0);
        let count = rows.len() / width;
        for (y, x) in iproduct!(0..count, 0..width) {
            rows[y * width + x] = self.evaluate(Pixel(x, top + y));
        }
    }
}
