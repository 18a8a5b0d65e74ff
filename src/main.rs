mod app;
mod board;
mod config;
mod console;
mod db;
mod domain;
mod filter;
mod highlight;
mod infrastructure;
mod session;
mod snapshot;

use anyhow::Result;
use infrastructure::{directories, logging, shutdown};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories, &config.snapshot)?;
    logging::init_tracing(&config, &paths)?;

    let (shutdown, _) = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = app::JobFilterApp::initialize(config, paths, shutdown.clone()).await?;
    app.run().await
}
