//! CLI entry point for magpie

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use magpie::{
    Collector, Delimiter, Error, SearchEngine, StatCalculator, default_extractors, print_report,
    print_report_json, write_csv,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "magpie")]
#[command(about = "Collect per-file metadata from a directory tree")]
#[command(version)]
struct Args {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Write delimited output to FILE instead of stdout
    #[arg(short = 'O', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output delimiter: ',', ';', or 'tab' (';' switches floats to
    /// decimal commas)
    #[arg(long = "delimiter", default_value = ",")]
    delimiter: Delimiter,

    /// Print aggregate statistics instead of the record table
    #[arg(long = "stats", conflicts_with = "search")]
    stats: bool,

    /// Print statistics as JSON (requires --stats)
    #[arg(long = "json", requires = "stats")]
    json: bool,

    /// Only output records whose fields contain QUERY (case-insensitive)
    #[arg(short = 's', long = "search", value_name = "QUERY")]
    search: Option<String>,

    /// Report progress on stderr while scanning
    #[arg(long = "progress")]
    progress: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut collector = match Collector::new(&args.path, default_extractors()) {
        Ok(collector) => collector,
        Err(Error::PathNotFound { path, .. }) => {
            eprintln!("magpie: path not found: {}", path.display());
            process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    let mut seen = 0usize;
    if args.progress {
        collector = collector.on_progress(|_| {
            seen += 1;
            if seen % 100 == 0 {
                eprint!("\rCollecting... {} files", seen);
            }
        });
    }
    collector.collect();
    let collection = collector.into_collection();
    if args.progress {
        eprintln!("\rCollected {} files", collection.len());
    }

    if args.stats {
        let stats = StatCalculator::new(&collection);
        if args.json {
            print_report_json(&stats)?;
        } else {
            print_report(&stats, should_use_color(args.color))?;
        }
        return Ok(());
    }

    let output = match &args.search {
        Some(query) => SearchEngine::new(&collection).search(query),
        None => collection,
    };

    match &args.output {
        Some(path) => write_csv(File::create(path)?, &output, args.delimiter)?,
        None => write_csv(io::stdout().lock(), &output, args.delimiter)?,
    }

    Ok(())
}
