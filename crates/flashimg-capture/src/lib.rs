//! Flash dump capture over a u-boot serial console.
//!
//! Reads a NAND flash image page by page using the console's
//! `nand dump <hexaddr>` command and writes the concatenated page data to
//! an output stream. The console transport is a trait so captures can be
//! driven over any bidirectional byte stream and tested without hardware.
//!
//! # Key entry points
//!
//! - [`capture_pages`] — the page capture loop
//! - [`Console`] / [`StreamConsole`] — the transport seam
//! - [`parse_dump_response`] — response parsing on its own

pub mod capture;
pub mod error;
pub mod protocol;

pub use capture::{capture_pages, Console, StreamConsole};
pub use error::{CaptureError, CaptureResult};
pub use protocol::{dump_command, parse_dump_response, PAGE_SIZE};
