//! `assetplate`: render or inspect a template tree from the command line.
//!
//! ```text
//! assetplate render templates index.html --data page.json
//! assetplate list templates
//! ```
//!
//! Logs go to stderr. `RUST_LOG` takes precedence over `-v`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assetplate::{Renderer, RendererConfig, UndefinedMode};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Parser)]
#[command(name = "assetplate", version, about = "Minify, compile and render template trees")]
struct Cli {
    /// Log every file loaded
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one template to stdout
    Render {
        /// Template root directory
        dir: PathBuf,
        /// Template name, relative to the root
        name: String,
        /// JSON file used as the template data
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
        /// Compile sources as written
        #[arg(long)]
        no_minify: bool,
        /// Render undefined variables as empty instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// List every template with its content class
    List {
        /// Template root directory
        dir: PathBuf,
        /// Compile sources as written
        #[arg(long)]
        no_minify: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render {
            dir,
            name,
            data,
            no_minify,
            lenient,
        } => {
            let undefined = if lenient {
                UndefinedMode::Lenient
            } else {
                UndefinedMode::Strict
            };
            let config = RendererConfig::new()
                .minify(!no_minify)
                .undefined(undefined);
            let renderer = load(&dir, config)?;
            let data = match data {
                Some(path) => read_data(&path)?,
                None => serde_json::Value::Null,
            };

            let stdout = io::stdout();
            let mut out = stdout.lock();
            renderer
                .execute(&mut out, &name, &data)
                .with_context(|| format!("failed to render {name}"))?;
            out.flush()?;
        }
        Command::List { dir, no_minify } => {
            let renderer = load(&dir, RendererConfig::new().minify(!no_minify))?;
            let snapshot = renderer.snapshot();

            let stdout = io::stdout();
            let mut out = stdout.lock();
            for name in snapshot.names() {
                if let Some(class) = snapshot.class_of(name) {
                    writeln!(out, "{name}\t{class}")?;
                }
            }
        }
    }
    Ok(())
}

fn load(dir: &Path, config: RendererConfig) -> Result<Renderer> {
    let renderer = Renderer::with_config(config)?;
    let count = renderer
        .load(dir)
        .with_context(|| format!("failed to load templates from {}", dir.display()))?;
    tracing::debug!(files = count, "templates ready");
    Ok(renderer)
}

fn read_data(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}
