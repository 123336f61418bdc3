//! Offset an image by prepending empty bytes.

use std::io::{self, Read, Write};

use crate::error::ShapeResult;
use crate::fill::write_fill;

/// Write `lead` empty bytes to `out`, then copy `input` through.
///
/// The opposite of padding: the fill goes in front of the content.
/// Returns the total number of bytes written.
pub fn offset<R: Read, W: Write>(mut input: R, lead: u64, mut out: W) -> ShapeResult<u64> {
    write_fill(&mut out, lead)?;
    let copied = io::copy(&mut input, &mut out)?;
    Ok(lead + copied)
}
