//! Initialization helpers for the application startup.

use crate::config::{Config, StorageConfig};
use crate::controller::{AudioPolicyController, HostServices};
use crate::engine::ListRegistry;
use crate::storage::{MemoryStorage, Persister, SqliteStorage, StorageService};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Sets up the tracing subscriber with the configured filters.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn setup_logging(config: &Config) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    let result = if config.logging.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}

/// Opens the configured storage backend.
pub fn init_storage(config: &StorageConfig) -> Result<Arc<dyn StorageService>> {
    match config.backend.as_str() {
        "sqlite" => {
            let storage = SqliteStorage::open(&config.sqlite_path, config.namespace.clone())
                .with_context(|| format!("Failed to open list storage at {}", config.sqlite_path))?;
            Ok(Arc::new(storage))
        }
        "memory" => {
            info!("Using in-memory list storage; permanent lists will not survive a restart.");
            Ok(Arc::new(MemoryStorage::new()))
        }
        other => {
            warn!("Unknown storage backend '{}', defaulting to memory", other);
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

/// Builds a controller whose registry holds the stored permanent lists.
///
/// A failed load is logged and the lists start empty.
pub async fn build_controller(
    config: &Config,
    storage: Arc<dyn StorageService>,
    host: HostServices,
) -> (AudioPolicyController, Persister) {
    let persister = Persister::spawn(storage.clone());
    let mut registry = ListRegistry::new().with_persister(persister.clone());

    if let Err(e) = registry.load_from_storage(storage.as_ref()).await {
        error!("Failed to load lists from storage: {}", e);
    }

    let controller = AudioPolicyController::new(registry, host, config.icons.clone());
    (controller, persister)
}

/// Reads the config at `path` if it exists, defaults otherwise.
pub async fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::load(path).await
    } else {
        Ok(Config::default())
    }
}
