use anyhow::{Context, Result};
use clap::Parser;

use picfetch::{
    cli::{Cli, Command, FetchConfig, run_fetch},
    config::AppConfig,
    fetcher::Fetcher,
    logging, server,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guard = logging::init(&config.log).context("Failed to initialize logging")?;

    match cli.command {
        Command::Fetch(args) => {
            let fetch = FetchConfig::resolve(args, &config);
            let fetcher = Fetcher::new(&config.http)?;
            run_fetch(&fetcher, &fetch)
                .await
                .with_context(|| format!("Failed to download {}", fetch.source_url))?;
            println!(
                "Image downloaded and saved as '{}'",
                fetch.output_path.display()
            );
        }
        Command::Serve(args) => {
            args.apply(&mut config);
            server::serve(config).await?;
        }
    }

    Ok(())
}
