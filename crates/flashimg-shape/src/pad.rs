//! Pad an image by appending empty bytes.

use std::io::{self, Read, Write};

use crate::error::{ShapeError, ShapeResult};
use crate::fill::write_fill;

/// Copy `input` to `out`, then append `pad_len` empty bytes.
///
/// Returns the total number of bytes written.
pub fn pad<R: Read, W: Write>(mut input: R, pad_len: u64, mut out: W) -> ShapeResult<u64> {
    let copied = io::copy(&mut input, &mut out)?;
    write_fill(&mut out, pad_len)?;
    Ok(copied + pad_len)
}

/// Pad `input` (known to be `input_len` bytes) out to `target` total bytes.
///
/// Fails without writing anything if `target` is smaller than the input.
pub fn pad_to_size<R: Read, W: Write>(
    input: R,
    input_len: u64,
    target: u64,
    out: W,
) -> ShapeResult<u64> {
    let pad_len = target
        .checked_sub(input_len)
        .ok_or(ShapeError::TargetTooSmall {
            target,
            input: input_len,
        })?;
    pad(input, pad_len, out)
}

#[cfg(test)]
mod tests {
    use flashimg_merge::EMPTY_BYTE;

    use super::*;

    #[test]
    fn appends_fill_after_content() {
        let mut out = Vec::new();
        let written = pad(&[0x01, 0x02][..], 3, &mut out).unwrap();
        assert_eq!(written, 5);
        assert_eq!(out, [0x01, 0x02, EMPTY_BYTE, EMPTY_BYTE, EMPTY_BYTE]);
    }

    #[test]
    fn zero_pad_is_a_plain_copy() {
        let mut out = Vec::new();
        let written = pad(&[0xAB, 0xCD][..], 0, &mut out).unwrap();
        assert_eq!(written, 2);
        assert_eq!(out, [0xAB, 0xCD]);
    }

    #[test]
    fn pad_to_size_derives_the_fill_amount() {
        let mut out = Vec::new();
        let written = pad_to_size(&[0x01, 0x02][..], 2, 6, &mut out).unwrap();
        assert_eq!(written, 6);
        assert_eq!(out.len(), 6);
        assert!(out[2..].iter().all(|&b| b == EMPTY_BYTE));
    }

    #[test]
    fn pad_to_current_size_writes_no_fill() {
        let mut out = Vec::new();
        let written = pad_to_size(&[0x01, 0x02][..], 2, 2, &mut out).unwrap();
        assert_eq!(written, 2);
        assert_eq!(out, [0x01, 0x02]);
    }

    #[test]
    fn target_below_input_size_is_rejected() {
        let err = pad_to_size(&[0u8; 8][..], 8, 4, Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::TargetTooSmall { target: 4, input: 8 }
        ));
    }
}
