//! `tpl` CLI: render a template with the process environment as its context.
//!
//! ## Usage
//!
//! ```sh
//! # Render to stdout; JSON-like values become lists and maps
//! HOSTS=[alpha,beta] tpl -t hosts.tpl
//!
//! # Render to a file, only looking at APP_* variables
//! tpl -t app.conf.tpl -o app.conf -p APP_
//!
//! # Show how each variable was classified
//! tpl -t app.conf.tpl -d
//!
//! # Print the version
//! tpl -v
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tpl_core::{EnvironmentTable, Renderer};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tpl",
    about = "Render a template with environment variables",
    disable_version_flag = true
)]
struct Cli {
    /// Template file
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only consider variables starting with prefix
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    debug: bool,

    /// Show version
    #[arg(short = 'v', long)]
    version: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("version {}", build_version());
        return Ok(());
    }

    init_logging(cli.debug);

    let Some(template) = cli.template else {
        bail!("a template file is required (-t/--template)");
    };
    if !template.exists() {
        bail!("{} not found", template.display());
    }

    let table = EnvironmentTable::from_process_env(&cli.prefix);
    debug!(?table, "environment table");

    // Render fully before touching the output file so a failed render
    // never truncates it.
    let rendered = Renderer::new(&template, table)
        .render()
        .with_context(|| format!("error rendering template {}", template.display()))?;

    write_output(cli.output.as_deref(), &rendered)
}

/// Version reported by `-v`: `TPL_BUILD_VERSION` at build time, else the crate version.
fn build_version() -> &'static str {
    option_env!("TPL_BUILD_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Log to stderr. `-d` turns on debug output for tpl; `RUST_LOG` overrides.
fn init_logging(debug: bool) {
    let default = if debug { "tpl=debug,tpl_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("error opening output file {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("error writing to stdout")?;
            stdout.flush().context("error writing to stdout")?;
        }
    }
    Ok(())
}
