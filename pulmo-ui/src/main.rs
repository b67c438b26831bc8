//! pulmo-ui - PulmoTriage Web UI Service
//!
//! Serves the risk-assessment dashboard and the analysis API, bridging
//! the pure fusion/triage engine to the external model processes.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pulmo_common::events::EventBus;
use pulmo_ui::AppState;

/// PulmoTriage web UI service
#[derive(Debug, Parser)]
#[command(name = "pulmo-ui", version)]
struct Args {
    /// Bind host
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(long)]
    port: Option<u16>,

    /// Directory containing the external model scripts
    #[arg(long, env = "PULMO_MODELS_DIR")]
    models_dir: Option<String>,

    /// Path to a TOML config file (overrides the platform default path)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Config priority: CLI argument > environment > config file > default
    let mut config = match &args.config {
        Some(path) => pulmo_common::config::parse_config_file(std::path::Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?,
        None => pulmo_common::config::load_or_default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(models_dir) = args.models_dir {
        config.models_dir = std::path::PathBuf::from(models_dir);
    }

    info!("Starting pulmo-ui (PulmoTriage Web UI) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Models directory: {}", config.models_dir.display());

    let event_bus = EventBus::new(100);
    let bind_addr = format!("{}:{}", config.host, config.port);

    let state = AppState::new(config, event_bus);
    let app = pulmo_ui::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
