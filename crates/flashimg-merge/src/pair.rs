//! Two-way byte merge with empty-marker conflict resolution.
//!
//! Flash images are merged byte-by-byte: equal bytes copy through, a 0xFF
//! byte is considered erased and loses to the other image's value, and two
//! differing non-0xFF bytes are an unresolvable conflict.

use std::io::{Read, Write};

use crate::error::{MergeError, MergeResult};

/// Byte value that marks an erased (empty) flash cell.
pub const EMPTY_BYTE: u8 = 0xFF;

/// Read buffer size for chunked merging.
const CHUNK_SIZE: usize = 8192;

/// Receives progress notifications during a merge.
///
/// Observers sit outside the merge logic and must not influence the result.
pub trait MergeObserver {
    /// Called after each chunk with the total number of bytes merged so far.
    fn on_progress(&mut self, _bytes_merged: u64) {}
}

/// Observer that ignores all notifications.
pub struct NullObserver;

impl MergeObserver for NullObserver {}

/// Merge two equal-length byte streams into `out`.
///
/// The caller guarantees both streams have the same total length. The
/// output has that same length and is produced incrementally; on a
/// [`MergeError::Conflict`] the destination is left incomplete and must not
/// be treated as a valid image. Stream lifetimes are the caller's concern.
///
/// Returns the number of bytes written.
pub fn merge_pair<R1, R2, W>(left: R1, right: R2, out: W) -> MergeResult<u64>
where
    R1: Read,
    R2: Read,
    W: Write,
{
    merge_pair_observed(left, right, out, &mut NullObserver)
}

/// Like [`merge_pair`], reporting progress to `observer`.
pub fn merge_pair_observed<R1, R2, W>(
    mut left: R1,
    mut right: R2,
    mut out: W,
    observer: &mut dyn MergeObserver,
) -> MergeResult<u64>
where
    R1: Read,
    R2: Read,
    W: Write,
{
    let mut lbuf = [0u8; CHUNK_SIZE];
    let mut rbuf = [0u8; CHUNK_SIZE];
    let mut merged: u64 = 0;

    loop {
        let n = read_up_to(&mut left, &mut lbuf)
            .map_err(|source| MergeError::Io { index: 0, source })?;
        if n == 0 {
            break;
        }
        right
            .read_exact(&mut rbuf[..n])
            .map_err(|source| MergeError::Io { index: 1, source })?;

        // Resolve in place; offsets in conflict reports are 1-based.
        for i in 0..n {
            lbuf[i] = resolve(lbuf[i], rbuf[i], merged + i as u64 + 1)?;
        }

        out.write_all(&lbuf[..n]).map_err(MergeError::Output)?;
        merged += n as u64;
        observer.on_progress(merged);
    }

    Ok(merged)
}

/// Resolve a single byte position.
fn resolve(b1: u8, b2: u8, offset: u64) -> MergeResult<u8> {
    if b1 == b2 {
        Ok(b1)
    } else if b1 == EMPTY_BYTE {
        Ok(b2)
    } else if b2 == EMPTY_BYTE {
        Ok(b1)
    } else {
        Err(MergeError::Conflict {
            offset,
            left: b1,
            right: b2,
        })
    }
}

/// Read until `buf` is full or the stream ends. Returns the bytes read.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
