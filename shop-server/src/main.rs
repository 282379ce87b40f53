use shop_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    setup_environment()?;

    print_banner();

    tracing::info!("Luxevie shop server starting...");

    // 2. Configuration
    let config = Config::from_env()?;
    tracing::info!(
        environment = %config.environment,
        timezone = %config.business_timezone,
        "Configuration loaded"
    );

    // 3. Database and shared state
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
