//! OCL dictionary manager CLI entry point

use anyhow::Context as _;
use clap::Parser;
use ocldm_cli::commands::{self, Context};
use ocldm_cli::{logging, render, Cli, Config};
use ocldm_client::OclClient;
use ocldm_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }
    if let Some(token) = cli.token {
        config.client.token = Some(token);
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.client.base_url,
        "Starting ocldm"
    );

    let client = OclClient::with_options(config.client.options())
        .context("Failed to create terminology client")?;
    let store = Store::new();
    let renderer = render::spawn_renderer(&store);

    let result = {
        let ctx = Context {
            api: &client,
            store: &store,
            config: &config,
        };
        commands::run(cli.command, &ctx).await
    };

    // Closing the store ends the renderer once it has printed everything.
    drop(store);
    renderer.await.context("Renderer task failed")?;

    for line in result? {
        println!("{}", line);
    }
    Ok(())
}
