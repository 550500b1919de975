// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render can fail.  None of these are recovered from: the
//! binary reports the error and exits.

use failure::Fail;
use std::io;

/// Errors raised while configuring, rendering, or writing an image.
#[derive(Debug, Fail)]
pub enum Error {
    /// Width or height was zero, or too large to describe as an image.
    #[fail(display = "invalid image dimensions {}x{}", width, height)]
    Dimensions {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The complex-plane window is empty or inside out.
    #[fail(display = "{}", _0)]
    Window(String),

    /// The maximum gray value must fit a single byte.
    #[fail(display = "max color must be between 1 and 255, got {}", _0)]
    MaxColor(usize),

    /// At least one iteration is needed to tell anything apart.
    #[fail(display = "iteration limit must be at least 1")]
    Limit,

    /// The block count does not split the image height evenly.
    #[fail(
        display = "{} blocks do not evenly divide an image {} rows high",
        blocks, height
    )]
    UnevenBlocks {
        /// Image height in rows.
        height: usize,
        /// Requested number of row-blocks.
        blocks: usize,
    },

    /// There must be at least one execution stream.
    #[fail(display = "stream count must be at least 1")]
    NoStreams,

    /// The output buffer could not be allocated.
    #[fail(display = "could not allocate {} bytes for the image", _0)]
    Allocation(usize),

    /// A stream was handed a command for a block it does not own.
    #[fail(display = "stream {} does not own block {}", stream, block)]
    ForeignBlock {
        /// The stream id the command was sent to.
        stream: usize,
        /// The block index named by the command.
        block: usize,
    },

    /// A stream's command queue closed before all work was issued.
    #[fail(display = "stream {} hung up", _0)]
    StreamClosed(usize),

    /// A worker thread panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The PGM comment line must start with '#' and fit on one line.
    #[fail(display = "bad PGM comment {:?}", _0)]
    BadComment(String),

    /// A command-line value could not be understood.
    #[fail(display = "{}", _0)]
    Argument(String),

    /// Opening or writing the output file failed.
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
