#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit of zero under z ← z² + c stays bounded.  Points
//! outside the set run off to infinity, some faster than others, and
//! the number of iterations it takes them to leave a circle of radius
//! two is what gets painted.
//!
//! Every pixel is independent of every other, which makes the grid an
//! embarrassingly parallel workload.  Two schedulers are provided:
//! a flat one that hands rows to a single pool of workers, and a
//! streamed one that cuts the image into row-blocks and queues each
//! block's upload, compute and download on one of a few execution
//! streams, the way one would feed an accelerator.  They produce the
//! same bytes.
//!
//! The result is written as a binary PGM.

pub mod blocks;
pub mod config;
pub mod error;
pub mod escape;
pub mod flat;
pub mod pgm;
pub mod planes;
pub mod render;
pub mod streams;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::escape::Evaluator;
pub use crate::render::{render, Strategy};
