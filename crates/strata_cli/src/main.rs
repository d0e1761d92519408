//! Strata CLI — the command-line interface for the Strata multi-die flow.
//!
//! Provides `strata run` for the full partition/migrate/legalize pipeline and
//! `strata report` for parsing a benchmark and printing its statistics.

#![warn(missing_docs)]

mod config;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use strata_legalize::LegalizeMode;

/// Strata — a multi-die partitioning and legalization flow.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Strata multi-die flow")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a custom `strata.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full multi-die flow on a benchmark.
    Run(RunArgs),
    /// Parse a benchmark and report its statistics.
    Report(ReportArgs),
}

/// Arguments for the `strata run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Benchmark file in ICCAD contest format.
    pub bench: PathBuf,

    /// Partition assignment file (`<inst> <die>` per line). When omitted,
    /// instances are split across dies by cumulative cell area.
    #[arg(short, long)]
    pub assignments: Option<PathBuf>,

    /// Number of dies to stack.
    #[arg(short, long)]
    pub dies: Option<usize>,

    /// Area ratio between adjacent dies, in (0, 1].
    #[arg(long)]
    pub area_ratio: Option<f64>,

    /// Legalizer to run on each die.
    #[arg(short, long, value_enum)]
    pub legalizer: Option<LegalizerChoice>,

    /// Output format for the run summary.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `strata report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Benchmark file in ICCAD contest format.
    pub bench: PathBuf,

    /// Output format for the statistics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Legalizer selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LegalizerChoice {
    /// Abacus-style clustered placement per row.
    Abacus,
    /// Capacity balancing across rows followed by left-to-right shifting.
    Shift,
}

impl From<LegalizerChoice> for LegalizeMode {
    fn from(choice: LegalizerChoice) -> Self {
        match choice {
            LegalizerChoice::Abacus => LegalizeMode::Abacus,
            LegalizerChoice::Shift => LegalizeMode::Shift,
        }
    }
}

/// Output format for run summaries and reports.
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
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Run(ref args) => pipeline::run(args, &global),
        Command::Report(ref args) => pipeline::report(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_run_default() {
        let cli = Cli::parse_from(["strata", "run", "case1.txt"]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.bench, PathBuf::from("case1.txt"));
                assert!(args.assignments.is_none());
                assert!(args.dies.is_none());
                assert!(args.area_ratio.is_none());
                assert!(args.legalizer.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_run_with_args() {
        let cli = Cli::parse_from([
            "strata",
            "run",
            "case1.txt",
            "--assignments",
            "case1.das",
            "--dies",
            "2",
            "--area-ratio",
            "0.5",
            "--legalizer",
            "shift",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(
                    args.assignments.as_deref(),
                    Some(std::path::Path::new("case1.das"))
                );
                assert_eq!(args.dies, Some(2));
                assert_eq!(args.area_ratio, Some(0.5));
                assert_eq!(args.legalizer, Some(LegalizerChoice::Shift));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_report_default() {
        let cli = Cli::parse_from(["strata", "report", "case1.txt"]);
        match cli.command {
            Command::Report(ref args) => {
                assert_eq!(args.bench, PathBuf::from("case1.txt"));
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Report command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["strata", "--quiet", "report", "case1.txt"]);
        assert!(cli.quiet);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["strata", "--config", "/path/strata.toml", "report", "c.txt"]);
        assert_eq!(cli.config.as_deref(), Some("/path/strata.toml"));
    }

    #[test]
    fn legalizer_choice_maps_to_mode() {
        assert_eq!(LegalizeMode::from(LegalizerChoice::Abacus), LegalizeMode::Abacus);
        assert_eq!(LegalizeMode::from(LegalizerChoice::Shift), LegalizeMode::Shift);
    }
}
