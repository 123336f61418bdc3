use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "flashimg",
    about = "Flash image toolkit — merge, pad, offset, and capture NAND dumps",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge two or more equal-size images into one
    Merge(MergeArgs),
    /// Append empty (0xff) bytes to the end of an image
    Pad(PadArgs),
    /// Prepend empty (0xff) bytes to the front of an image
    Offset(OffsetArgs),
    /// Capture a flash dump over a u-boot serial console
    Dump(DumpArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Input image; repeat for each image to merge
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<String>,
    /// Output file (a kept temporary file when omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args)]
pub struct PadArgs {
    /// Image to pad
    pub file: String,
    /// Final file size in bytes, or the pad amount with --padsize
    pub size: u64,
    /// Interpret SIZE as the number of bytes to append
    #[arg(short, long)]
    pub padsize: bool,
    /// Output file (a kept temporary file when omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args)]
pub struct OffsetArgs {
    /// Image to offset
    pub file: String,
    /// Number of empty bytes to prepend
    pub offset: u64,
    /// Output file (a kept temporary file when omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args)]
pub struct DumpArgs {
    /// Output file; refused if it already exists
    pub file: String,
    /// First page to dump
    pub start_page: u64,
    /// Number of pages to dump
    pub page_count: u64,
    /// Serial console device; line settings (e.g. 115200 raw) must already
    /// be configured on it
    #[arg(long, default_value = "/dev/ttyUSB0")]
    pub port: String,
}
