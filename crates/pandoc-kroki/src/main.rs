//! pandoc-kroki - pandoc JSON filter rendering diagrams via Kroki.
//!
//! Reads a pandoc JSON document on stdin, replaces diagram code blocks with
//! images and writes the document to stdout:
//!
//! ```text
//! pandoc doc.md --filter pandoc-kroki -o doc.html
//! ```
//!
//! Diagnostics go to stderr only; stdout carries the document and nothing else.

mod error;

use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use console::{Style, Term};
use kroki_config::{CliSettings, Config};
use kroki_pandoc::DiagramFilter;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use error::CliError;

/// Render Kroki diagrams in a pandoc document.
#[derive(Parser)]
#[command(name = "pandoc-kroki", version, about)]
struct Cli {
    /// Target output format, passed by pandoc.
    format: Option<String>,

    /// Kroki server URL (overrides KROKI_SERVER).
    #[arg(long)]
    kroki_url: Option<String>,

    /// Directory for rendered diagrams (overrides KROKI_CACHE).
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides KROKI_TIMEOUT).
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Enable informational logging (same as KROKI_VERBOSE=1).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> CliSettings {
        CliSettings {
            kroki_url: self.kroki_url.clone(),
            cache_dir: self.cache_dir.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            verbose: self.verbose.then_some(true),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = Config::load(Some(&cli.settings()))
        .map_err(CliError::from)
        .and_then(|config| {
            init_tracing(config.verbose);
            for notice in &config.notices {
                tracing::info!("{notice}");
            }
            run(&config, cli.format.as_deref())
        });

    if let Err(err) = result {
        let red = Style::new().red();
        let _ = Term::stderr().write_line(&red.apply_to(format!("[kroki] Error: {err}")).to_string());
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr.
///
/// Verbose enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(config: &Config, format: Option<&str>) -> Result<(), CliError> {
    tracing::info!(
        server = %config.server_url,
        cache = %config.cache_dir.display(),
        target = format.unwrap_or("unknown"),
        "starting kroki filter"
    );

    let mut filter = DiagramFilter::from_config(config)?;

    let mut doc: Value =
        serde_json::from_reader(BufReader::new(io::stdin().lock())).map_err(CliError::Input)?;
    filter.transform_document(&mut doc)?;

    let mut out = BufWriter::new(io::stdout().lock());
    serde_json::to_writer(&mut out, &doc).map_err(CliError::Output)?;
    out.flush()?;

    let stats = filter.stats();
    tracing::info!(
        rendered = stats.rendered,
        cached = stats.cached,
        "kroki filter finished"
    );
    Ok(())
}
