use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::debug;

use flashimg_capture::{capture_pages, StreamConsole};
use flashimg_merge::{merge_chain, MergeSource};
use flashimg_shape::{offset, pad, pad_to_size};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args),
        Command::Pad(args) => cmd_pad(args),
        Command::Offset(args) => cmd_offset(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    if args.inputs.len() < 2 {
        bail!("merging requires at least two input files");
    }

    let expected = image_size(&args.inputs[0])?;
    for path in &args.inputs[1..] {
        let len = image_size(path)?;
        if len != expected {
            bail!(
                "for merging all files need to be the same size: {} is {} bytes, {} is {} bytes",
                args.inputs[0],
                expected,
                path,
                len
            );
        }
    }

    debug!(inputs = args.inputs.len(), size = expected, "input sizes validated");

    let mut sources = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
        sources.push(MergeSource::new(BufReader::new(file), expected));
    }

    let (out, out_path) = open_output(args.output.as_deref())?;
    println!(
        "merging {} into {}",
        args.inputs.join(" and ").bold(),
        out_path.display().to_string().yellow()
    );

    let mut writer = BufWriter::new(out);
    match merge_chain(sources, &mut writer) {
        Ok(written) => {
            writer.flush()?;
            doublecheck_size(&out_path, expected);
            println!("{} merged {} bytes", "✓".green().bold(), written);
            Ok(())
        }
        Err(err) => {
            // The destination holds a partial image; do not leave it behind.
            drop(writer);
            let _ = fs::remove_file(&out_path);
            Err(anyhow::Error::new(err).context(format!(
                "merge failed, removed incomplete output {}",
                out_path.display()
            )))
        }
    }
}

fn cmd_pad(args: PadArgs) -> anyhow::Result<()> {
    let input_len = image_size(&args.file)?;
    let input = BufReader::new(
        File::open(&args.file).with_context(|| format!("cannot open {}", args.file))?,
    );

    let (out, out_path) = open_output(args.output.as_deref())?;
    if args.padsize {
        println!(
            "padding {} with {} empty bytes into {}",
            args.file.bold(),
            args.size,
            out_path.display().to_string().yellow()
        );
    } else {
        println!(
            "padding {} to a final size of {} bytes into {}",
            args.file.bold(),
            args.size,
            out_path.display().to_string().yellow()
        );
    }

    let mut writer = BufWriter::new(out);
    let result = if args.padsize {
        pad(input, args.size, &mut writer)
    } else {
        pad_to_size(input, input_len, args.size, &mut writer)
    };

    match result {
        Ok(written) => {
            writer.flush()?;
            doublecheck_size(&out_path, written);
            println!("{} wrote {} bytes", "✓".green().bold(), written);
            Ok(())
        }
        Err(err) => {
            drop(writer);
            let _ = fs::remove_file(&out_path);
            Err(anyhow::Error::new(err).context("padding failed"))
        }
    }
}

fn cmd_offset(args: OffsetArgs) -> anyhow::Result<()> {
    let input = BufReader::new(
        File::open(&args.file).with_context(|| format!("cannot open {}", args.file))?,
    );

    let (out, out_path) = open_output(args.output.as_deref())?;
    println!(
        "offsetting {} by {} bytes into {}",
        args.file.bold(),
        args.offset,
        out_path.display().to_string().yellow()
    );

    let mut writer = BufWriter::new(out);
    let written = offset(input, args.offset, &mut writer)?;
    writer.flush()?;

    doublecheck_size(&out_path, written);
    println!("{} wrote {} bytes", "✓".green().bold(), written);
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    if Path::new(&args.file).exists() {
        bail!("output file {} already exists", args.file);
    }

    let device = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&args.port)
        .with_context(|| format!("cannot open console device {}", args.port))?;
    let mut console = StreamConsole::new(device);

    let out = File::create(&args.file).with_context(|| format!("cannot create {}", args.file))?;
    let mut writer = BufWriter::new(out);

    println!(
        "dumping {} pages starting at page {} from {} into {}",
        args.page_count,
        args.start_page,
        args.port.bold(),
        args.file.yellow()
    );

    let written = capture_pages(
        &mut console,
        &mut writer,
        args.start_page,
        args.page_count,
        |page| {
            print!("\rpage {page}");
            let _ = io::stdout().flush();
        },
    )?;
    writer.flush()?;

    println!();
    println!(
        "{} captured {} bytes into {}",
        "✓".green().bold(),
        written,
        args.file
    );
    Ok(())
}

/// Size oracle: the filesystem's view of an input image.
fn image_size(path: &str) -> anyhow::Result<u64> {
    let meta = fs::metadata(path).with_context(|| format!("cannot stat {path}"))?;
    Ok(meta.len())
}

/// Open the result sink: the named file, or a kept temporary whose printed
/// path stays valid after the process exits.
fn open_output(path: Option<&str>) -> anyhow::Result<(File, PathBuf)> {
    match path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("cannot create {p}"))?;
            Ok((file, PathBuf::from(p)))
        }
        None => {
            let (file, path) = tempfile::Builder::new()
                .prefix("flashimg-")
                .tempfile()
                .context("cannot create temporary output file")?
                .keep()
                .context("cannot keep temporary output file")?;
            Ok((file, path))
        }
    }
}

/// Warn (without failing) when the written file's size is not what the
/// operation produced.
fn doublecheck_size(path: &Path, expected: u64) {
    match fs::metadata(path) {
        Ok(meta) if meta.len() != expected => println!(
            "{} size of output file {} is {} bytes, expected {}",
            "warning:".yellow().bold(),
            path.display(),
            meta.len(),
            expected
        ),
        Ok(_) => {}
        Err(err) => println!(
            "{} cannot stat output file {}: {err}",
            "warning:".yellow().bold(),
            path.display()
        ),
    }
}
