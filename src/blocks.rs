//! Splitting the image into row-blocks for the streamed scheduler.
//!
//! Block `n` covers rows `[n * rows, (n + 1) * rows)` and belongs to
//! stream `n % streams + 1`.  Blocks always tile the image exactly; a
//! block count that would leave a remainder is refused rather than
//! silently dropping the last rows.

use std::ops::Range;

use crate::error::{Error, Result};

/// Default number of execution streams.
pub const STREAMS: usize = 3;

/// A contiguous run of rows and the stream that will process it.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Position of the block, counting from the top of the image.
    pub index: usize,
    /// Rows covered by this block.
    pub rows: Range<usize>,
    /// 1-based id of the stream this block is queued on.
    pub stream: usize,
}

impl Block {
    /// Number of bytes in this block for rows `width` pixels wide.
    pub fn size(&self, width: usize) -> usize {
        (self.rows.end - self.rows.start) * width
    }

    /// Byte offset of the block in the image buffer.
    pub fn offset(&self, width: usize) -> usize {
        self.rows.start * width
    }
}

/// Stream id for block `index` when round-robining over `streams`.
#[inline]
pub fn stream_for(index: usize, streams: usize) -> usize {
    index % streams + 1
}

/// Split `height` rows into `blocks` equal blocks spread over
/// `streams` streams.
pub fn partition(height: usize, blocks: usize, streams: usize) -> Result<Vec<Block>> {
    if streams == 0 {
        return Err(Error::NoStreams);
    }
    if blocks == 0 || blocks > height || height % blocks != 0 {
        return Err(Error::UnevenBlocks { height, blocks });
    }
    let rows = height / blocks;
    Ok((0..blocks)
        .map(|index| Block {
            index,
            rows: index * rows..(index + 1) * rows,
            stream: stream_for(index, streams),
        })
        .collect())
}
