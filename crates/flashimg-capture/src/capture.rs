//! Page-by-page flash dump capture.

use std::io::{Read, Write};

use tracing::debug;

use crate::error::{CaptureError, CaptureResult};
use crate::protocol::{dump_command, parse_dump_response, response_complete, PAGE_SIZE};

/// Request/response console that dump commands are issued over.
pub trait Console {
    /// Send one command and return everything the device printed back.
    fn exchange(&mut self, command: &str) -> CaptureResult<String>;
}

/// Console over any bidirectional byte stream, typically a serial device
/// file.
///
/// Line settings (baud rate, raw mode) must already be configured on the
/// underlying device; this type only moves bytes.
pub struct StreamConsole<T> {
    stream: T,
}

impl<T> StreamConsole<T> {
    pub fn new(stream: T) -> Self {
        Self { stream }
    }

    /// Give the underlying stream back.
    pub fn into_inner(self) -> T {
        self.stream
    }
}

impl<T: Read + Write> Console for StreamConsole<T> {
    fn exchange(&mut self, command: &str) -> CaptureResult<String> {
        self.stream.write_all(command.as_bytes())?;
        self.stream.flush()?;

        let mut response = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = self.stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            response.extend_from_slice(&chunk[..n]);
            if response_complete(&response) {
                break;
            }
        }
        Ok(String::from_utf8_lossy(&response).into_owned())
    }
}

/// Dump `page_count` pages starting at `start_page` into `out`, invoking
/// `progress` with each page number as it is requested.
///
/// Pages are requested strictly in order. A response that does not decode
/// to a full page aborts the capture: every later page would otherwise
/// land at the wrong file offset.
///
/// Returns the number of bytes written.
pub fn capture_pages<C, W, F>(
    console: &mut C,
    mut out: W,
    start_page: u64,
    page_count: u64,
    mut progress: F,
) -> CaptureResult<u64>
where
    C: Console,
    W: Write,
    F: FnMut(u64),
{
    let mut total: u64 = 0;
    for page in start_page..start_page + page_count {
        progress(page);
        debug!(page, "requesting page dump");

        let response = console.exchange(&dump_command(page))?;
        let data = parse_dump_response(&response)?;
        if data.len() as u64 != PAGE_SIZE {
            return Err(CaptureError::ShortPage {
                page,
                expected: PAGE_SIZE as usize,
                actual: data.len(),
            });
        }

        out.write_all(&data)?;
        total += data.len() as u64;
    }
    Ok(total)
}
