use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    citycast_core::init()?;

    let (config, _) = citycast_core::Config::load_validated()?;
    tracing::info!(
        "CityCast starting (config directory: {})",
        config.config_dir.display()
    );

    let server = citycast_server::Server::new(&config)?;
    server.run().await?;

    tracing::info!("CityCast stopped");
    Ok(())
}
