//! escrle - Compress and decompress text files with escaped run-length encoding
//!
//! Compression writes `<name>.rle.txt` into the output directory and reports
//! the size change; decompression writes `<name>.decompressed.txt`.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use escrle_core::{DecoderConfig, RunLengthCodec, SizeReport, TextCodec};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Suffix appended to compressed files
const COMPRESSED_SUFFIX: &str = ".rle.txt";

/// Suffix appended to decompressed files
const DECOMPRESSED_SUFFIX: &str = ".decompressed.txt";

/// Fallback stem when stripping suffixes leaves nothing
const DECOMPRESSED_FALLBACK: &str = "decompressed";

/// Compress and decompress text files with escaped run-length encoding
#[derive(Parser, Debug)]
#[command(name = "escrle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output directory for written files
    #[arg(short, long, global = true, default_value = ".")]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry run - don't write files, just show what would be written
    #[arg(long, global = true)]
    dry_run: bool,

    /// Overwrite existing files without prompting
    #[arg(long, global = true)]
    force: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run-length encode text files
    Compress {
        #[command(flatten)]
        input: InputMode,

        /// Decode the result again and check it matches the input
        #[arg(long)]
        verify: bool,
    },
    /// Restore text files from their run-length encoding
    Decompress {
        #[command(flatten)]
        input: InputMode,

        /// Reject runs longer than this (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_run_length: u64,

        /// Reject files that would decode to more than this many bytes (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_output_bytes: usize,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single text file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory of text files to process
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

/// Direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Compress,
    Decompress,
}

/// Settings resolved from the command line for one invocation
struct Job {
    direction: Direction,
    codec: RunLengthCodec,
    output: PathBuf,
    dry_run: bool,
    force: bool,
    verify: bool,
}

#[derive(Default)]
struct JobStats {
    processed: usize,
    skipped: usize,
    failed: usize,
    written: usize,
    original_bytes: usize,
    encoded_bytes: usize,
}

impl JobStats {
    fn print_summary(&self, direction: Direction) {
        info!(
            "Summary: {} processed, {} skipped, {} failed, {} written",
            self.processed, self.skipped, self.failed, self.written
        );
        if direction == Direction::Compress {
            let total = SizeReport {
                original_bytes: self.original_bytes,
                encoded_bytes: self.encoded_bytes,
            };
            info!("Total: {}", total);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let (job, input) = Job::from_cli(&cli);

    // Dispatch based on input mode
    if let Some(ref file) = input.file {
        process_single_file(&job, file)
    } else if let Some(ref directory) = input.directory {
        process_directory(&job, directory)
    } else {
        bail!("Either --file or --directory must be specified")
    }
}

impl Job {
    fn from_cli(cli: &Cli) -> (Self, &InputMode) {
        let (direction, input, verify, config) = match &cli.command {
            Command::Compress { input, verify } => {
                (Direction::Compress, input, *verify, DecoderConfig::new())
            }
            Command::Decompress {
                input,
                max_run_length,
                max_output_bytes,
            } => {
                let mut config = DecoderConfig::new();
                if *max_run_length > 0 {
                    config = config.max_run_length(*max_run_length);
                }
                if *max_output_bytes > 0 {
                    config = config.max_output_len(*max_output_bytes);
                }
                (Direction::Decompress, input, false, config)
            }
        };

        let job = Job {
            direction,
            codec: RunLengthCodec::with_config(config),
            output: cli.output.clone(),
            dry_run: cli.dry_run,
            force: cli.force,
            verify,
        };
        (job, input)
    }
}

/// Process a single text file
fn process_single_file(job: &Job, file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("Input file does not exist: {}", file.display());
    }
    if !file.is_file() {
        bail!("Input path is not a file: {}", file.display());
    }

    let mut stats = JobStats::default();
    process_text_file(job, file, &job.output, &mut stats)?;

    if !job.dry_run {
        stats.print_summary(job.direction);
    }

    Ok(())
}

/// Process a directory of text files recursively
fn process_directory(job: &Job, directory: &Path) -> Result<()> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let mut stats = JobStats::default();

    for entry in WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        // Skip hidden files
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
        {
            continue;
        }

        if !is_candidate(path, job.direction) {
            trace!("Skipping: {}", path.display());
            stats.skipped += 1;
            continue;
        }

        // Mirror the source layout so same-named files in different
        // subdirectories never share an output path
        let output_dir = match path.parent().and_then(|p| p.strip_prefix(directory).ok()) {
            Some(relative) => job.output.join(relative),
            None => job.output.clone(),
        };

        debug!("Processing: {}", path.display());
        if let Err(e) = process_text_file(job, path, &output_dir, &mut stats) {
            // Log error but continue with other files
            warn!("Error processing {}: {:#}", path.display(), e);
            stats.failed += 1;
        }
    }

    if !job.dry_run {
        stats.print_summary(job.direction);
    }

    Ok(())
}

/// Decides whether a file found in directory mode should be processed
fn is_candidate(path: &Path, direction: Direction) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let compressed = has_suffix_ignore_case(name, COMPRESSED_SUFFIX);
    match direction {
        Direction::Compress => {
            !compressed && !has_suffix_ignore_case(name, DECOMPRESSED_SUFFIX)
        }
        Direction::Decompress => compressed,
    }
}

fn has_suffix_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .map(|tail| tail.eq_ignore_ascii_case(suffix))
            .unwrap_or(false)
}

/// Output file name for a compressed file
fn compressed_name(name: &str) -> String {
    format!("{}{}", name, COMPRESSED_SUFFIX)
}

/// Output file name for a decompressed file.
///
/// Strips a trailing `.rle.txt` or `.txt` (case-insensitive).
fn decompressed_name(name: &str) -> String {
    let stem = [COMPRESSED_SUFFIX, ".txt"]
        .iter()
        .find(|suffix| has_suffix_ignore_case(name, suffix))
        .map(|suffix| &name[..name.len() - suffix.len()])
        .unwrap_or(name);

    let stem = if stem.is_empty() {
        DECOMPRESSED_FALLBACK
    } else {
        stem
    };
    format!("{}{}", stem, DECOMPRESSED_SUFFIX)
}

/// Read, transform and write one file into `output_dir`
fn process_text_file(
    job: &Job,
    path: &Path,
    output_dir: &Path,
    stats: &mut JobStats,
) -> Result<()> {
    trace!("Reading {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    trace!("Read {} bytes from {}", content.len(), path.display());

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Input file name is not valid UTF-8: {}", path.display()))?;

    let (output, output_name) = match job.direction {
        Direction::Compress => {
            if content.is_empty() {
                println!("{}: empty file, nothing to compress", path.display());
                stats.skipped += 1;
                return Ok(());
            }

            let encoded = job.codec.encode(&content);
            if job.verify {
                verify_round_trip(&job.codec, &content, &encoded)
                    .with_context(|| format!("Verification failed: {}", path.display()))?;
            }

            let report = SizeReport::new(&content, &encoded);
            println!("{}: {}", path.display(), report);
            stats.original_bytes += report.original_bytes;
            stats.encoded_bytes += report.encoded_bytes;

            (encoded, compressed_name(file_name))
        }
        Direction::Decompress => {
            let decoded = job
                .codec
                .decode(&content)
                .with_context(|| format!("Failed to decompress: {}", path.display()))?;
            println!("{}: decompressed successfully", path.display());
            (decoded, decompressed_name(file_name))
        }
    };
    stats.processed += 1;

    let output_path = output_dir.join(output_name);
    if job.dry_run {
        println!("Would write: {}", output_path.display());
        return Ok(());
    }

    match write_output_file(&output_path, &output, job.force) {
        Ok(()) => {
            println!("Wrote {}", output_path.display());
            stats.written += 1;
            Ok(())
        }
        Err(e) => {
            error!("Failed to write {}: {:#}", output_path.display(), e);
            Err(e)
        }
    }
}

/// Decode `encoded` and compare digests with the original text
fn verify_round_trip(codec: &dyn TextCodec, original: &str, encoded: &str) -> Result<()> {
    let decoded = codec.decode(encoded)?;
    let expected = blake3::hash(original.as_bytes());
    let actual = blake3::hash(decoded.as_bytes());
    if expected != actual {
        bail!(
            "round trip mismatch with {} codec: expected {}, got {}",
            codec.name(),
            expected.to_hex(),
            actual.to_hex()
        );
    }
    debug!("Round trip verified ({})", &expected.to_hex()[..8]);
    Ok(())
}

/// Write an output file to disk
fn write_output_file(output_path: &Path, content: &str, force: bool) -> Result<()> {
    // Create parent directories
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    let mut file = fs::File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", output_path.display()))?;

    Ok(())
}
