//! `mailsmith`: render practice emails from JSON data files.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use mailsmith_render::{DocumentType, RenderConfig, RenderRequest, Renderer};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailsmith")]
#[command(about = "Render email-safe HTML reports, alerts and updates")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Renderer config file (YAML, or JSON with a .json extension).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a data file to an HTML email.
    Render {
        /// Document type, e.g. practice_report or alert-notification.
        document: DocumentType,

        /// JSON data file, or `-` for stdin.
        #[arg(short, long)]
        data: PathBuf,

        /// Theme override. Unknown names fall back to inference.
        #[arg(short, long)]
        theme: Option<String>,

        /// Recipient address; repeatable. Used for theme inference.
        #[arg(short, long = "recipient")]
        recipients: Vec<String>,

        /// Keep class styling and a full <style> block.
        #[arg(long)]
        no_inline: bool,

        /// Write the HTML here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print render statistics as JSON to stderr.
        #[arg(long)]
        stats: bool,
    },

    /// Check a data file against a document type's field contract.
    Validate {
        document: DocumentType,

        /// JSON data file, or `-` for stdin.
        #[arg(short, long)]
        data: PathBuf,
    },

    /// List registered themes and their tokens.
    Themes,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    match path {
        Some(path) => RenderConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RenderConfig::default()),
    }
}

fn read_data(path: &Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading data from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing {} as JSON", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            document,
            data,
            theme,
            recipients,
            no_inline,
            out,
            stats,
        } => {
            if no_inline {
                config.inline_styles = false;
            }
            let renderer = Renderer::new(config);
            let request = RenderRequest {
                document_type: document,
                data: read_data(&data)?,
                theme,
                recipients,
            };
            let email = renderer
                .render(&request)
                .with_context(|| format!("rendering {}", document))?;

            match out {
                Some(path) => fs::write(&path, &email.html)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => io::stdout()
                    .write_all(email.html.as_bytes())
                    .context("writing to stdout")?,
            }
            if stats {
                let summary = serde_json::json!({
                    "subject": email.subject,
                    "theme": email.theme,
                    "stats": email.stats,
                });
                eprintln!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
        Command::Validate { document, data } => {
            let renderer = Renderer::new(config);
            renderer
                .validate(document, &read_data(&data)?)
                .with_context(|| format!("{} data is invalid", document))?;
            println!("{}: ok", document);
        }
        Command::Themes => {
            let renderer = Renderer::new(config);
            let default = renderer.themes().default_theme().name().to_string();
            for theme in renderer.themes().iter() {
                let marker = if theme.name() == default { " (default)" } else { "" };
                println!("{}{}", theme.name(), marker);
                for (token, value) in theme.tokens() {
                    println!("  {:<18}{}", token, value);
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
