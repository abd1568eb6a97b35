use tracing_subscriber::EnvFilter;

use mcp_manager::{api, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mcp_manager=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Working directory: {}", config.working_dir.display());

    api::serve(config).await
}
