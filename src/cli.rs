use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::{
    config::{AppConfig, FormVariant},
    error::Result,
    fetcher::Fetcher,
};

/// Fetch images over HTTP and save them to disk
#[derive(Debug, Parser)]
#[command(name = "picfetch", version, about)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "PICFETCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download one image and exit
    Fetch(FetchArgs),
    /// Serve the image download form
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Image URL; defaults to `cli.source_url`
    pub url: Option<String>,

    /// Output file; defaults to `cli.output_path`
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Form rendered at `/`
    #[arg(long, value_enum)]
    pub form: Option<FormVariant>,
}

impl ServeArgs {
    /// Override server settings given on the command line
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(form) = self.form {
            config.server.form = form;
        }
    }
}

/// Source and destination of a one-shot fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub source_url: String,
    pub output_path: PathBuf,
}

impl FetchConfig {
    /// Command line values, falling back to the configured defaults
    pub fn resolve(args: FetchArgs, config: &AppConfig) -> Self {
        Self {
            source_url: args.url.unwrap_or_else(|| config.cli.source_url.clone()),
            output_path: args
                .output
                .unwrap_or_else(|| config.cli.output_path.clone()),
        }
    }
}

/// Stream `fetch.source_url` into `fetch.output_path`
pub async fn run_fetch(fetcher: &Fetcher, fetch: &FetchConfig) -> Result<u64> {
    info!("Fetching {}", fetch.source_url);
    fetcher
        .download_to(&fetch.source_url, &fetch.output_path)
        .await
}
