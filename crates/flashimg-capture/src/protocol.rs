//! Parsing of u-boot `nand dump` console responses.
//!
//! A dump exchange looks like:
//!
//! ```text
//! nand dump 0x1000
//! Page 0x1000 dump:
//!         ff ff ff 2a ...
//!         ...
//! OOB:
//!         ff ff ...
//! ```
//!
//! The page data is the hex text between the `dump:` marker and the
//! `OOB:` marker; the out-of-band section is discarded.

use crate::error::{CaptureError, CaptureResult};

/// NAND page size in bytes.
pub const PAGE_SIZE: u64 = 2048;

/// Marker that precedes the page data in a dump response.
const DATA_PREFIX: &str = "dump:";

/// Marker that ends the page data and starts the out-of-band section.
const DATA_POSTFIX: &str = "OOB:";

/// Minimum plausible length of a full page-dump response: 2048 bytes as
/// hex pairs plus the console's per-line addressing and whitespace.
const MIN_RESPONSE_LEN: usize = 6700;

/// Build the console command that dumps the given page.
pub fn dump_command(page: u64) -> String {
    format!("nand dump {:#x}\n", page * PAGE_SIZE)
}

/// Extract the page data bytes from a raw console response.
///
/// Searches for the *last* `dump:` marker so that leftover out-of-band
/// text from the previous exchange, still sitting in the console buffer,
/// cannot shift the data window. Whitespace and line structure inside the
/// hex region are ignored.
pub fn parse_dump_response(response: &str) -> CaptureResult<Vec<u8>> {
    if response.len() < MIN_RESPONSE_LEN {
        return Err(CaptureError::ResponseTooShort(response.len()));
    }

    let start = response
        .rfind(DATA_PREFIX)
        .ok_or(CaptureError::MissingMarker(DATA_PREFIX))?
        + DATA_PREFIX.len();
    let end = response[start..]
        .find(DATA_POSTFIX)
        .map(|i| start + i)
        .ok_or(CaptureError::MissingMarker(DATA_POSTFIX))?;

    let digits: String = response[start..end]
        .chars()
        .filter(char::is_ascii_hexdigit)
        .collect();
    Ok(hex::decode(digits)?)
}

/// Returns `true` once `buf` holds a complete dump response: the data
/// prefix followed, eventually, by the out-of-band marker.
pub fn response_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    match text.rfind(DATA_PREFIX) {
        Some(i) => text[i..].contains(DATA_POSTFIX),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Render `data` the way the u-boot console does: hex pairs in
    /// space-separated lines, padded out past the minimum response length.
    fn fake_response(data: &[u8]) -> String {
        let mut resp = String::from("nand dump 0x0\nPage 0x0 dump:\n");
        for chunk in data.chunks(16) {
            resp.push('\t');
            for b in chunk {
                resp.push_str(&format!("{b:02x} "));
            }
            resp.push('\n');
        }
        resp.push_str("OOB:\n");
        // Spare-area lines and the trailing prompt put a real console
        // response comfortably past the minimum-length check.
        while resp.len() < MIN_RESPONSE_LEN + 100 {
            resp.push_str("\tff ff ff ff ff ff ff ff\n");
        }
        resp.push_str("=> ");
        resp
    }

    fn full_page() -> Vec<u8> {
        (0..PAGE_SIZE).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn command_addresses_pages_in_hex() {
        assert_eq!(dump_command(0), "nand dump 0x0\n");
        assert_eq!(dump_command(1), "nand dump 0x800\n");
        assert_eq!(dump_command(256), "nand dump 0x80000\n");
    }

    #[test]
    fn parses_a_full_page() {
        let page = full_page();
        let parsed = parse_dump_response(&fake_response(&page)).unwrap();
        assert_eq!(parsed, page);
    }

    #[test]
    fn ignores_leading_garbage_from_the_previous_exchange() {
        // Leftover OOB text in front contains its own "OOB:" marker; the
        // parser must anchor on the last "dump:".
        let page = full_page();
        let resp = format!("OOB:\n\tff ff ff ff\n=> {}", fake_response(&page));
        assert_eq!(parse_dump_response(&resp).unwrap(), page);
    }

    #[test]
    fn short_response_is_rejected() {
        let err = parse_dump_response("dump:\nff ff\nOOB:\n").unwrap_err();
        assert!(matches!(err, CaptureError::ResponseTooShort(_)));
    }

    #[test]
    fn missing_data_prefix_is_rejected() {
        let long = "x".repeat(MIN_RESPONSE_LEN + 10);
        let err = parse_dump_response(&long).unwrap_err();
        assert!(matches!(err, CaptureError::MissingMarker("dump:")));
    }

    #[test]
    fn missing_oob_marker_is_rejected() {
        let mut resp = String::from("dump:\n");
        resp.push_str(&"ff ".repeat(MIN_RESPONSE_LEN / 3 + 10));
        let err = parse_dump_response(&resp).unwrap_err();
        assert!(matches!(err, CaptureError::MissingMarker("OOB:")));
    }

    #[test]
    fn odd_digit_count_is_invalid_hex() {
        let mut resp = String::from("dump:\n");
        resp.push_str(&"ff ".repeat(2240));
        resp.push_str("a\nOOB:\n");
        let err = parse_dump_response(&resp).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidHex(_)));
    }

    #[test]
    fn completion_requires_oob_after_the_last_dump_marker() {
        assert!(!response_complete(b"nand dump 0x0\nPage dump:\n ff ff"));
        assert!(response_complete(b"Page dump:\n ff ff\nOOB:\n"));
        // An OOB marker from the previous page, before this page's data,
        // does not complete the response.
        assert!(!response_complete(b"OOB:\n ff ff\n=> Page dump:\n ff"));
    }
}
