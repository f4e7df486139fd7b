//! Account service binary.
//!
//! Reads configuration from `$ACCOUNT_SERVICE_CONFIG` or
//! `~/.config/account-service/config.toml`.

use tracing::{error, info};

use account_service::{init_tracing, resolve_config_path, server, AppConfig, ServerOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = resolve_config_path();
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    server::run(ServerOptions {
        config,
        ..Default::default()
    })
    .await
}
