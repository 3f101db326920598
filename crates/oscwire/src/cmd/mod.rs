use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod build;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a raw OSC packet and print its contents.
    Inspect(InspectArgs),
    /// Assemble an OSC packet from an address and typed arguments.
    Build(BuildArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Inspect(args) => inspect::run(args, format),
        Command::Build(args) => build::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Packet file to read ("-" for stdin).
    pub input: PathBuf,
    /// Decode through the unchecked fast path, tolerating malformed packets.
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// OSC address pattern (must begin with '/').
    pub address: String,
    /// Typed argument, repeatable: i:42, f:440.0, h:1, d:0.5, s:text,
    /// b:<hex>, or a bare T, F, N, I. A blob must be the last argument.
    #[arg(long = "arg", value_name = "SPEC")]
    pub args: Vec<String>,
    /// Write the raw packet to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
    /// Buffer capacity in bytes.
    #[arg(long, default_value = "1024")]
    pub capacity: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
