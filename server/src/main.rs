// Forbid unwrap() in production code to prevent panics from corrupt data.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use simulacao::config::ServerConfig;
use simulacao::restriction::{FixedRestrictionList, RestrictionLookup};
use simulacao::service::default_seed;
use simulacao::storage::{OpenedStore, open_store};
use simulacao::{AppState, SimulationService, router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simulacao=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: listen_port={}, data_directory={}, restriction_timeout={}ms",
        config.listen_port,
        config
            .data_directory
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |dir| dir.display().to_string()),
        config.restriction_timeout.as_millis()
    );

    let opened = open_or_exit(&config);
    let service = Arc::new(SimulationService::new(opened.store));

    // A store that has held data keeps whatever its users left in it,
    // including deletions of seed simulations.
    if config.seed && opened.is_new {
        match service.seed(default_seed()) {
            Ok(created) => tracing::info!("Seeded {created} simulations"),
            Err(e) => {
                tracing::error!("Failed to seed simulations: {e}");
                std::process::exit(1);
            }
        }
    }

    let restrictions: Arc<dyn RestrictionLookup> = match &config.restrictions_file {
        Some(path) => match FixedRestrictionList::from_file(path) {
            Ok(list) => {
                tracing::info!(
                    "Loaded {} restricted CPFs from {}",
                    list.len(),
                    path.display()
                );
                Arc::new(list)
            }
            Err(e) => {
                tracing::error!("Failed to load restrictions: {e}");
                std::process::exit(1);
            }
        },
        None => Arc::new(FixedRestrictionList::default_dataset()),
    };

    let app = router(AppState {
        service,
        restrictions,
        restriction_timeout: config.restriction_timeout,
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}

/// Open the durable log if a data directory is configured, otherwise an
/// in-memory store. Exits the process if the log cannot be opened.
fn open_or_exit(config: &ServerConfig) -> OpenedStore {
    if let Some(directory) = &config.data_directory {
        if let Err(e) = std::fs::create_dir_all(directory) {
            tracing::error!("Failed to create data directory: {e}");
            std::process::exit(1);
        }
    } else {
        tracing::warn!("No data directory configured; simulations will not survive a restart");
    }

    let log_path = config.log_path();
    open_store(log_path.as_deref()).unwrap_or_else(|e| {
        tracing::error!("Failed to open simulation store: {e}");
        std::process::exit(1);
    })
}
