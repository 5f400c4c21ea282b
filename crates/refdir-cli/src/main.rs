//! refdir CLI tool.
//!
//! Usage:
//! ```bash
//! refdir check [OPTIONS] <PROGRAM>...
//! refdir kinds
//! refdir init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use refdir_core::{Direction, RefKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Reports identifiers referenced before or after their definition
#[derive(Parser)]
#[command(name = "refdir")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print all findings, with definition positions
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check resolved program documents
    Check {
        /// Program documents produced by the front-end (JSON)
        #[arg(required = true)]
        programs: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Direction of references to functions and methods
        #[arg(long, value_name = "DIR")]
        func_dir: Option<Direction>,

        /// Direction of type references, excluding references to the receiver type
        #[arg(long, value_name = "DIR")]
        type_dir: Option<Direction>,

        /// Direction of references to the receiver type
        #[arg(long, value_name = "DIR")]
        recvtype_dir: Option<Direction>,

        /// Direction of references to var declarations
        #[arg(long, value_name = "DIR")]
        var_dir: Option<Direction>,

        /// Direction of references to const declarations
        #[arg(long, value_name = "DIR")]
        const_dir: Option<Direction>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List reference kinds and their effective directions
    Kinds,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for findings.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
    /// Source excerpts with labeled spans.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = config_resolver::resolve(std::path::Path::new("."), cli.config.as_deref());

    match cli.command {
        Commands::Check {
            programs,
            format,
            func_dir,
            type_dir,
            recvtype_dir,
            var_dir,
            const_dir,
            no_color,
        } => {
            let overrides: Vec<(RefKind, Direction)> = [
                (RefKind::Func, func_dir),
                (RefKind::Type, type_dir),
                (RefKind::RecvType, recvtype_dir),
                (RefKind::Var, var_dir),
                (RefKind::Const, const_dir),
            ]
            .into_iter()
            .filter_map(|(kind, dir)| dir.map(|d| (kind, d)))
            .collect();

            let options = commands::check::CheckOptions {
                format,
                overrides,
                verbose: cli.verbose,
                no_color,
            };
            commands::check::run(&programs, &options, &source)
        }
        Commands::Kinds => commands::kinds::run(&source),
        Commands::Init { force } => commands::init::run(force),
    }
}
