//! tlog CLI: inspect and drive incremental-build dependency logs.
//!
//! Provides `tlog check` to ask whether a target is up to date, `tlog record`
//! to add read/write facts after a successful build, `tlog show` to print the
//! recorded builds, and `tlog clear` to forget everything.

#![warn(missing_docs)]

mod check;
mod clear;
mod logging;
mod record;
mod session;
mod show;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// tlog: incremental-build dependency tracking.
#[derive(Parser, Debug)]
#[command(name = "tlog", version, about = "Incremental build dependency logs")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `tlog.toml` configuration file. Defaults to `tlog.toml` in
    /// the intermediate directory, if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Intermediate directory holding the dependency logs.
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether a target is up to date with its recorded build.
    Check(CheckArgs),
    /// Record read and write dependencies for a source and save the logs.
    Record(RecordArgs),
    /// Print the recorded builds.
    Show(ShowArgs),
    /// Delete both dependency logs.
    Clear,
}

/// Arguments for the `tlog check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The source file whose build is checked.
    pub source: PathBuf,

    /// The target file the build is expected to have produced.
    pub target: PathBuf,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `tlog record` subcommand.
#[derive(Parser, Debug)]
pub struct RecordArgs {
    /// The source file that was built.
    pub source: PathBuf,

    /// Files read while building the source.
    #[arg(long, num_args = 1..)]
    pub read: Vec<PathBuf>,

    /// Files written while building the source.
    #[arg(long, num_args = 1..)]
    pub write: Vec<PathBuf>,
}

/// Arguments for the `tlog show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Only show the record for this source.
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
    /// Intermediate directory holding the logs.
    pub dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    logging::initialize(cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
        dir: cli.dir,
    };

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Record(ref args) => record::run(args, &global),
        Command::Show(ref args) => show::run(args, &global),
        Command::Clear => clear::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
