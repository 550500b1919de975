//! Binary PGM ("P5") output.
//!
//! The header is four lines: the magic number, a single comment line,
//! the width and height, and the maxval.  Raw bytes follow, row-major,
//! top row first.

use image::GrayImage;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// The comment line written when none is given.
pub const COMMENT: &str = "#comment";

/// A PGM comment is a single line starting with '#'.
pub fn check_comment(comment: &str) -> Result<()> {
    if !comment.starts_with('#') || comment.contains('\n') || comment.contains('\r') {
        return Err(Error::BadComment(comment.to_string()));
    }
    Ok(())
}

/// Write the P5 header for a `width` by `height` image.
pub fn write_header<W: Write>(
    out: &mut W,
    width: usize,
    height: usize,
    max_color: usize,
    comment: &str,
) -> Result<()> {
    check_comment(comment)?;
    write!(out, "P5\n{}\n{} {}\n{}\n", comment, width, height, max_color)?;
    Ok(())
}

/// Write a whole PGM file: header, then every pixel.
pub fn write_pgm<W: Write>(
    out: &mut W,
    image: &GrayImage,
    max_color: usize,
    comment: &str,
) -> Result<()> {
    let (width, height) = image.dimensions();
    write_header(out, width as usize, height as usize, max_color, comment)?;
    out.write_all(&**image)?;
    out.flush()?;
    Ok(())
}

/// Open `path` for writing, truncating anything already there.
pub fn create<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let path = path.as_ref();
    debug!("opening {}", path.display());
    Ok(BufWriter::new(File::create(path)?))
}

/// Create `path` and write the image to it.
pub fn save<P: AsRef<Path>>(
    path: P,
    image: &GrayImage,
    max_color: usize,
    comment: &str,
) -> Result<()> {
    let mut out = create(path)?;
    write_pgm(&mut out, image, max_color, comment)
}
