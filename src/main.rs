//! Titubate CLI - inspect test-run state

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use titubate::{render, seed, FixSuggestion, State, StateError};

#[derive(Parser)]
#[command(name = "titubate")]
#[command(about = "Titubate - inspect test-run state bags")]
#[command(version)]
struct Cli {
    /// Log at debug level when RUST_LOG is unset
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a state and print its dump
    Dump {
        /// JSON or YAML seed file (top-level object)
        file: Option<PathBuf>,

        /// Extra entries, applied in order after the file
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Print one value through a typed accessor
    Get {
        /// JSON or YAML seed file (top-level object)
        file: PathBuf,

        /// Key to read
        key: String,

        /// Accessor to read the value with
        #[arg(long = "as", value_enum, default_value_t = Accessor::Any)]
        accessor: Accessor,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Accessor {
    Any,
    String,
    Int,
    Long,
    Bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    let result = match cli.command {
        Commands::Dump { file, set } => dump_state(file.as_deref(), &set),
        Commands::Get {
            file,
            key,
            accessor,
        } => get_value(&file, &key, accessor),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn dump_state(file: Option<&Path>, assignments: &[String]) -> Result<(), StateError> {
    let mut state = match file {
        Some(path) => seed::from_path(path)?,
        None => State::new(),
    };

    for assignment in assignments {
        let (key, value) = seed::parse_assignment(assignment)?;
        state.set(key, value);
    }

    println!("{}", state.dump());
    Ok(())
}

fn get_value(file: &Path, key: &str, accessor: Accessor) -> Result<(), StateError> {
    let state = seed::from_path(file)?;

    let rendered = match accessor {
        Accessor::Any => state.get(key).map(render),
        Accessor::String => state.get_string(key)?.map(str::to_string),
        Accessor::Int => state.get_int(key)?.map(|v| v.to_string()),
        Accessor::Long => state.get_long(key)?.map(|v| v.to_string()),
        Accessor::Bool => state.get_bool(key)?.map(|v| v.to_string()),
    };

    println!("{}", rendered.as_deref().unwrap_or("null"));
    Ok(())
}
