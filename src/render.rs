//! Choosing a scheduler and owning the image it fills.

use image::GrayImage;
use log::info;
use std::time::{Duration, Instant};

use crate::blocks::STREAMS;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::escape::Evaluator;
use crate::flat::render_flat;
use crate::streams::render_streamed;

/// Default number of row-blocks for the streamed scheduler.
pub const BLOCKS: usize = 8;

/// How the grid is spread over the machine.  Both strategies produce
/// the same bytes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Strategy {
    /// One pool of `threads` workers over every row.
    Flat {
        /// Worker count.
        threads: usize,
    },
    /// `blocks` row-blocks queued round-robin on `streams` streams.
    Streamed {
        /// Number of row-blocks; must divide the height.
        blocks: usize,
        /// Number of execution streams.
        streams: usize,
        /// Worker count shared between the streams.
        threads: usize,
    },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Streamed {
            blocks: BLOCKS,
            streams: STREAMS,
            threads: num_cpus::get(),
        }
    }
}

/// A zeroed buffer of `len` bytes, or `Error::Allocation` if the
/// memory is not there.
pub fn allocate(len: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation(len))?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Render the image described by `config`.
pub fn render(config: &Config, strategy: &Strategy) -> Result<GrayImage> {
    render_timed(config, strategy).map(|(image, _)| image)
}

/// Render the image described by `config`, also returning how long the
/// scheduler took.  Building the kernel and allocating the buffer are
/// not counted.
pub fn render_timed(config: &Config, strategy: &Strategy) -> Result<(GrayImage, Duration)> {
    info!(
        "rendering {}x{}, {} iterations, {:?}",
        config.width(),
        config.height(),
        config.limit(),
        strategy
    );
    let evaluator = Evaluator::new(config)?;
    let mut pixels = allocate(config.pixel_count())?;
    let start = Instant::now();
    match *strategy {
        Strategy::Flat { threads } => render_flat(&evaluator, &mut pixels, threads)?,
        Strategy::Streamed {
            blocks,
            streams,
            threads,
        } => {
            render_streamed(&evaluator, &mut pixels, blocks, streams, threads)?;
        }
    }
    let elapsed = start.elapsed();
    let image = GrayImage::from_raw(config.width() as u32, config.height() as u32, pixels)
        .ok_or(Error::Dimensions {
            width: config.width(),
            height: config.height(),
        })?;
    Ok((image, elapsed))
}
