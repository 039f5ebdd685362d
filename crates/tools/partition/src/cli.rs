//! Command line arguments and the stdin-to-stdout driver
//!
//! Flags are accepted in both clap's `--batchsize 8` form and the
//! single-dash `-batchsize=8` form used by older scripts; see
//! [`normalize_args`].

use crate::config::{PartitionConfig, DEFAULT_BATCH_SIZE, DEFAULT_BLOCK_SIZE};
use crate::io::{read_spans, write_result};
use crate::partition::partition;
use crate::types::{PartitionError, Result};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::io::{Read, Write};
use tracing::debug;

/// Partition - reads a JSON-encoded list of block spans and creates subvolumes
#[derive(Parser, Debug, Clone)]
#[command(name = "partition")]
#[command(
    about = "Reads a JSON-encoded list of block spans from stdin and creates subvolumes",
    long_about = None
)]
pub struct Cli {
    /// Number of blocks along one axis of a subvolume
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, allow_negative_numbers = true)]
    pub batchsize: i64,

    /// Number of voxels along one axis of a block
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE, allow_negative_numbers = true)]
    pub blocksize: i64,

    /// Run in verbose mode (debug logging on stderr)
    #[arg(long)]
    pub verbose: bool,

    /// Optional command; `help` shows this message
    pub command: Vec<String>,
}

impl Cli {
    /// Parse arguments after normalizing single-dash long flags
    pub fn try_parse_normalized<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// True when the first positional argument is `help`
    pub fn wants_help(&self) -> bool {
        self.command
            .first()
            .is_some_and(|command| command.eq_ignore_ascii_case("help"))
    }

    pub fn config(&self) -> PartitionConfig {
        PartitionConfig::new(self.batchsize, self.blocksize)
    }
}

/// Rewrite `-name` / `-name=value` arguments to `--name` / `--name=value`.
///
/// The program name, `-h`, a bare `-`, and anything after `--` are left
/// untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for (position, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if position == 0 || passthrough {
            normalized.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                passthrough = true;
                None
            }
            Some(text) if is_single_dash_long(text) => Some(OsString::from(format!("-{text}"))),
            _ => None,
        };
        normalized.push(rewritten.unwrap_or(arg));
    }

    normalized
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }

    let name = rest.split('=').next().unwrap_or_default();
    name.len() > 1 && name.chars().all(|c| c.is_ascii_alphabetic())
}

/// Read spans from `input`, partition them, and write the JSON summary to
/// `output`.
///
/// With a `help` command the usage text is written instead and `input` is
/// never read. Nothing is written when reading, parsing or accumulation
/// fails.
pub fn run<R: Read, W: Write>(cli: &Cli, input: R, mut output: W) -> Result<()> {
    if cli.wants_help() {
        let help = Cli::command().render_help();
        write!(output, "{help}").map_err(PartitionError::StreamWrite)?;
        return output.flush().map_err(PartitionError::StreamWrite);
    }

    let config = cli.config();
    config.validate()?;
    debug!(
        batch_size = config.batch_size,
        block_size = config.block_size,
        capacity = config.capacity,
        "starting partition"
    );

    let spans = read_spans(input)?;
    let result = partition(&config, &spans)?;
    write_result(output, &result)
}
