//! Packed event array CLI application.
//!
//! Decodes, generates and inspects flat files of packed 64-bit event words.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use evarr_core::output::{CsvWriter, TriggerCsvWriter};
use evarr_core::{
    mono, trigger, Encoding, FieldOrder, MonoEvent, PackedReader, PackedWriter, SynthConfig,
    TriggerEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Number of words decoded per chunk.
const READ_CHUNK_WORDS: usize = 1_000_000;

/// Tool for packed event-camera event arrays.
///
/// Each event is one little-endian 64-bit word: polarity (bit 63), y (62..48),
/// x (47..32) and a time delta (31..0) relative to a time base.
#[derive(Parser, Debug)]
#[command(name = "evarr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a packed file to CSV
    Decode(DecodeArgs),
    /// Write synthetic mono events to a packed file
    Generate(GenerateArgs),
    /// Print the first records of a packed file
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Input packed file path
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output CSV file path
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Time base added to every event's time delta
    #[arg(short = 'b', long, default_value_t = 0)]
    time_base: u64,

    /// Record variant stored in the input (mono or trigger)
    #[arg(short, long, default_value = "mono")]
    encoding: String,

    /// Field order for mono CSV output.
    ///
    /// Format: comma-separated field names (x, y, p, t)
    ///
    /// Examples:
    /// - "x,y,p,t" (default)
    /// - "t,x,y,p" (time first)
    /// - "x,y,t,p"
    #[arg(short, long, default_value = "x,y,p,t")]
    format: String,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Output packed file path
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Number of events to generate
    #[arg(short = 'n', long, default_value_t = 50)]
    count: usize,

    /// Time between consecutive events
    #[arg(short, long, default_value_t = 1000)]
    dt: u64,

    /// Sensor width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Sensor height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Input packed file path
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Time base added to every event's time delta
    #[arg(short = 'b', long, default_value_t = 0)]
    time_base: u64,

    /// Record variant stored in the input (mono or trigger)
    #[arg(short, long, default_value = "mono")]
    encoding: String,

    /// Number of records to print
    #[arg(short = 'n', long, default_value_t = 10)]
    limit: usize,
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Decode(args) => decode(args),
        Command::Generate(args) => generate(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn spinner(quiet: bool, message: String) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    pb.set_message(message);
    Ok(pb)
}

fn file_name(path: &Path) -> &std::ffi::OsStr {
    path.file_name().unwrap_or_default()
}

fn decode(args: DecodeArgs) -> Result<()> {
    let field_order = FieldOrder::from_str(&args.format)
        .context("Invalid field format. Use comma-separated: x,y,p,t")?;
    let encoding = Encoding::from_str(&args.encoding).context("Invalid encoding")?;

    let progress = spinner(
        args.quiet,
        format!("Decoding {:?}...", file_name(&args.input)),
    )?;
    let start_time = Instant::now();

    let mut reader = PackedReader::open(&args.input)
        .with_context(|| format!("Failed to open {:?}", args.input))?;
    let out = File::create(&args.output)
        .with_context(|| format!("Failed to create {:?}", args.output))?;

    let mut words = Vec::with_capacity(READ_CHUNK_WORDS);
    let mut num_events = 0u64;
    let mut num_on = 0u64;

    match encoding {
        Encoding::Mono => {
            let mut writer = CsvWriter::new(out, field_order);
            writer.write_header()?;
            loop {
                words.clear();
                let n = reader
                    .read_chunk(&mut words, READ_CHUNK_WORDS)
                    .context("Failed to read packed events")?;
                if n == 0 {
                    break;
                }
                for &word in &words {
                    let event = MonoEvent::from_word(word, args.time_base);
                    num_on += event.polarity as u64;
                    writer.write_event(&event)?;
                }
                num_events += n as u64;
                progress.set_message(format!("Decoded {} events...", num_events));
            }
            writer.flush().context("Failed to write CSV output")?;
        }
        Encoding::Trigger => {
            let mut writer = TriggerCsvWriter::new(out);
            writer.write_header()?;
            loop {
                words.clear();
                let n = reader
                    .read_chunk(&mut words, READ_CHUNK_WORDS)
                    .context("Failed to read packed events")?;
                if n == 0 {
                    break;
                }
                for &word in &words {
                    let event = TriggerEvent::from_word(word, args.time_base);
                    num_on += event.polarity as u64;
                    writer.write_event(&event)?;
                }
                num_events += n as u64;
                progress.set_message(format!("Decoded {} events...", num_events));
            }
            writer.flush().context("Failed to write CSV output")?;
        }
    }

    let duration = start_time.elapsed();
    progress.finish_with_message(format!(
        "Done! Decoded {} {} events in {:.2}s",
        num_events,
        encoding,
        duration.as_secs_f64()
    ));

    if !args.quiet {
        eprintln!();
        eprintln!("Summary:");
        eprintln!("  Input:        {:?}", args.input);
        eprintln!("  Output:       {:?}", args.output);
        eprintln!("  Encoding:     {}", encoding);
        eprintln!("  Time base:    {}", args.time_base);
        eprintln!("  Events:       {}", num_events);
        eprintln!("  ON / OFF:     {} / {}", num_on, num_events - num_on);
        print_throughput(num_events, duration);
    }

    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let config = SynthConfig {
        count: args.count,
        dt: args.dt,
        width: args.width,
        height: args.height,
    };
    let words = config.words().context("Invalid generator settings")?;

    let progress = spinner(
        args.quiet,
        format!("Writing {:?}...", file_name(&args.output)),
    )?;
    let start_time = Instant::now();

    let mut writer = PackedWriter::create(&args.output)
        .with_context(|| format!("Failed to create {:?}", args.output))?;
    for word in words {
        writer.write_word(word)?;
    }
    writer.flush().context("Failed to write packed output")?;

    let duration = start_time.elapsed();
    progress.finish_with_message(format!(
        "Done! Wrote {} events in {:.2}s",
        writer.events_written(),
        duration.as_secs_f64()
    ));

    if !args.quiet {
        eprintln!();
        eprintln!("Summary:");
        eprintln!("  Output:       {:?}", args.output);
        eprintln!("  Events:       {}", writer.events_written());
        eprintln!("  Sensor:       {}x{}", args.width, args.height);
        eprintln!("  Spacing:      {}", args.dt);
        print_throughput(writer.events_written(), duration);
    }

    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let encoding = Encoding::from_str(&args.encoding).context("Invalid encoding")?;
    let mut reader = PackedReader::open(&args.input)
        .with_context(|| format!("Failed to open {:?}", args.input))?;

    for index in 0..args.limit {
        let Some(word) = reader.read_word().context("Failed to read packed events")? else {
            break;
        };
        match encoding {
            Encoding::Mono => {
                let (t, x, y, p) = mono::decode_t_x_y_p(word, args.time_base);
                println!(
                    "{:>8}  {:#018x}  t={} x={} y={} p={}",
                    index, word, t, x, y, p as u8
                );
            }
            Encoding::Trigger => {
                let (t, p) = trigger::decode_t_p(word, args.time_base);
                println!("{:>8}  {:#018x}  t={} p={}", index, word, t, p as u8);
            }
        }
    }

    Ok(())
}

fn print_throughput(num_events: u64, duration: Duration) {
    let secs = duration.as_secs_f64().max(f64::EPSILON);
    eprintln!("  Duration:     {:.3}s", duration.as_secs_f64());
    eprintln!(
        "  Throughput:   {:.3} Mev/s",
        num_events as f64 * 1e-6 / secs
    );
}
