//! Binary entry point for the tugoutline CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Merged outline of a fixture, as JSON
//! tugoutline outline shapes.json
//!
//! # Indented text, first context only
//! tugoutline outline shapes.json --format text --no-merge
//!
//! # Elements whose name contains "area", with their ancestors
//! tugoutline find shapes.json --query area
//!
//! # Innermost element at line 12, column 5 (1-based)
//! tugoutline at shapes.json --line 12 --col 5
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use tugoutline::cli::{load_config, run_at, run_find, run_outline, Overrides};
use tugoutline_core::error::{OutlineError, OutputErrorCode};
use tugoutline_core::output::{emit_response, render_text, ErrorResponse, OutlineResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Structure outlines for source files compiled under several project contexts.
#[derive(Parser, Debug)]
#[command(name = "tugoutline", version, about = "Structure outlines across project contexts")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Config file (default: nearest .tugoutline/config.toml above the fixture).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output (RUST_LOG takes precedence).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Output format for outline responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full JSON response (default).
    #[default]
    Json,
    /// One indented line per element.
    Text,
}

/// Flags shared by commands that build an outline.
#[derive(clap::Args, Debug)]
struct OutlineArgs {
    /// Fixture document (JSON).
    fixture: PathBuf,
    /// Convert only the first context instead of merging all of them.
    #[arg(long)]
    no_merge: bool,
    /// Show property and event accessors as children.
    #[arg(long)]
    expose_accessors: bool,
}

impl OutlineArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            no_merge: self.no_merge,
            expose_accessors: self.expose_accessors,
        }
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Build the outline for a fixture.
    Outline {
        #[command(flatten)]
        args: OutlineArgs,
        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Keep elements whose name contains a keyword (case-insensitive).
    Find {
        #[command(flatten)]
        args: OutlineArgs,
        /// Keyword to match.
        #[arg(long)]
        query: String,
        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Report the innermost element at a position.
    At {
        #[command(flatten)]
        args: OutlineArgs,
        /// Line (1-based).
        #[arg(long)]
        line: u32,
        /// Column (1-based).
        #[arg(long)]
        col: u32,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_format);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), OutlineError> {
    match cli.command {
        Command::Outline { args, format } => {
            let config = load_config(cli.global.config.as_deref(), &args.fixture)?;
            let response = run_outline(&config, args.overrides(), &args.fixture)?;
            write_outline(&response, format)
        }
        Command::Find {
            args,
            query,
            format,
        } => {
            let config = load_config(cli.global.config.as_deref(), &args.fixture)?;
            let response = run_find(&config, args.overrides(), &args.fixture, &query)?;
            write_outline(&response, format)
        }
        Command::At { args, line, col } => {
            let config = load_config(cli.global.config.as_deref(), &args.fixture)?;
            let response = run_at(&config, args.overrides(), &args.fixture, line, col)?;
            emit_response(&response, &mut io::stdout())?;
            let _ = io::stdout().flush();
            Ok(())
        }
    }
}

fn write_outline(response: &OutlineResponse, format: OutputFormat) -> Result<(), OutlineError> {
    let mut stdout = io::stdout();
    match format {
        OutputFormat::Json => emit_response(response, &mut stdout)?,
        OutputFormat::Text if !response.is_available() => {
            writeln!(stdout, "no outline available for {}", response.file)?
        }
        OutputFormat::Text => render_text(&response.elements, &mut stdout)?,
    }
    let _ = stdout.flush();
    Ok(())
}
