use crate::{
    abstract_trait::DynHashing,
    config::{Config, ConnectionPool, Hashing},
    di::{DependenciesInject, DependenciesInjectDeps, Repositories},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("app_name", &self.config.app_name)
            .field("app_version", &self.config.app_version)
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: Config) -> Result<Self> {
        Self::with_repositories(Repositories::postgres(pool), config).await
    }

    /// State backed by the in-memory store, for HTTP tests.
    #[cfg(any(test, feature = "testing"))]
    pub async fn in_memory(config: Config) -> Result<Self> {
        Self::with_repositories(Repositories::in_memory(), config).await
    }

    async fn with_repositories(repositories: Repositories, config: Config) -> Result<Self> {
        let hashing = Arc::new(Hashing::new(config.bcrypt_cost)) as DynHashing;
        let registry = Arc::new(Mutex::new(Registry::default()));

        let deps = DependenciesInjectDeps {
            repositories,
            hash: hashing,
            registry: registry.clone(),
        };

        let di_container = DependenciesInject::new(deps)
            .await
            .context("Failed to initialize dependency injection container")?;

        Ok(Self {
            di_container,
            registry,
            config: Arc::new(config),
        })
    }
}
