use orderd::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv is optional, absence is fine)
    let _ = dotenv::dotenv();

    // 2. Load configuration
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    // 3. Logging (console + daily rolling file under work_dir/logs)
    init_logger_with_file(None, config.log_dir().to_str());

    tracing::info!("orderd starting...");

    // 4. Initialize server state (database, cache, auth)
    let state = ServerState::initialize(&config).await?;

    // 5. Run HTTP server until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
