//! The fixed description of a render: canvas size, gray depth,
//! iteration cap, and the window onto the complex plane.  Built once
//! and passed by reference to the evaluator and the schedulers.

use crate::error::{Error, Result};
use num::Complex;

/// Default canvas width in pixels.
pub const WIDTH: usize = 800;
/// Default canvas height in pixels.
pub const HEIGHT: usize = 600;
/// Default PGM maxval.
pub const MAX_COLOR: usize = 255;
/// Default iteration cap.
pub const LIMIT: usize = 255;

/// An immutable render configuration.  Use `Config::new` to get one
/// that has been checked, or `Config::default` for the standard
/// 800x600 view of the whole set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    width: usize,
    height: usize,
    max_color: usize,
    limit: usize,
    leftlower: Complex<f64>,
    rightupper: Complex<f64>,
}

impl Config {
    /// Validates and builds a configuration.  The window is given as
    /// its left-lower and right-upper corners.
    pub fn new(
        width: usize,
        height: usize,
        max_color: usize,
        limit: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<Config> {
        if width == 0
            || height == 0
            || width > u32::max_value() as usize
            || height > u32::max_value() as usize
            || width.checked_mul(height).is_none()
        {
            return Err(Error::Dimensions { width, height });
        }
        if max_color == 0 || max_color > 255 {
            return Err(Error::MaxColor(max_color));
        }
        if limit == 0 {
            return Err(Error::Limit);
        }
        if !(leftlower.re < rightupper.re) {
            return Err(Error::Window(
                "The left lower corner is not to the left of the right upper corner.".to_string(),
            ));
        }
        if !(leftlower.im < rightupper.im) {
            return Err(Error::Window(
                "The left lower corner is not lower than the right upper corner".to_string(),
            ));
        }
        Ok(Config {
            width,
            height,
            max_color,
            limit,
            leftlower,
            rightupper,
        })
    }

    /// Same as the default configuration, but with a different canvas.
    pub fn with_size(width: usize, height: usize) -> Result<Config> {
        let d = Config::default();
        Config::new(width, height, d.max_color, d.limit, d.leftlower, d.rightupper)
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The PGM maxval written to the header.
    pub fn max_color(&self) -> usize {
        self.max_color
    }

    /// Iteration cap.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Left-lower corner of the complex window.
    pub fn leftlower(&self) -> Complex<f64> {
        self.leftlower
    }

    /// Right-upper corner of the complex window.
    pub fn rightupper(&self) -> Complex<f64> {
        self.rightupper
    }

    /// Number of pixels, and so bytes, in the image.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: WIDTH,
            height: HEIGHT,
            max_color: MAX_COLOR,
            limit: LIMIT,
            leftlower: Complex::new(-2.0, -1.5),
            rightupper: Complex::new(1.0, 1.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> (Complex<f64>, Complex<f64>) {
        (Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5))
    }

    #[test]
    fn default_is_the_classic_view() {
        let c = Config::default();
        assert_eq!((c.width(), c.height()), (800, 600));
        assert_eq!(c.max_color(), 255);
        assert_eq!(c.pixel_count(), 480_000);
        let (ll, ru) = window();
        assert_eq!(Config::new(800, 600, 255, 255, ll, ru).unwrap(), c);
    }

    #[test]
    fn rejects_empty_canvas() {
        let (ll, ru) = window();
        assert!(Config::new(0, 600, 255, 255, ll, ru).is_err());
        assert!(Config::new(800, 0, 255, 255, ll, ru).is_err());
    }

    #[test]
    fn rejects_bad_max_color_and_limit() {
        let (ll, ru) = window();
        assert!(Config::new(4, 2, 0, 255, ll, ru).is_err());
        assert!(Config::new(4, 2, 256, 255, ll, ru).is_err());
        assert!(Config::new(4, 2, 255, 0, ll, ru).is_err());
    }

    #[test]
    fn rejects_inside_out_window() {
        let (ll, ru) = window();
        assert!(Config::new(4, 2, 255, 255, ru, ll).is_err());
        let flat = Complex::new(1.0, -1.5);
        assert!(Config::new(4, 2, 255, 255, ll, flat).is_err());
        assert!(Config::new(4, 2, 255, 255, flat, ru).is_err());
    }
}
