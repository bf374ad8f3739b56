//! Composition root: turns a [`Config`] into a running service.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::adapter::inbound::http::{self, AppState};
use crate::adapter::outbound::identity::{HostedIdentity, LocalIdentity};
use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteStore};
use crate::application::{AttendancePolicy, Clock, PackageService, Services};
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::service::IdentityProviderKind;
use crate::infrastructure::config::settings::Config;
use crate::port::IdentityProvider;

/// Open the database and bring its schema up to date.
pub fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = create_pool(&config.database)?;
    let applied = run_migrations(&pool)?;
    if applied > 0 {
        info!(database = %config.database, applied, "Applied database migrations");
    }
    Ok(SqliteStore::new(pool))
}

/// Build the configured identity provider.
pub fn identity_provider(config: &Config) -> Result<Arc<dyn IdentityProvider>> {
    match config.identity.provider {
        IdentityProviderKind::Local => {
            warn!("Using the in-process identity provider; accounts are not persisted");
            Ok(Arc::new(LocalIdentity::new()))
        }
        IdentityProviderKind::Hosted => {
            let url = config
                .identity
                .url
                .as_deref()
                .ok_or(Error::Config(ConfigError::MissingField {
                    field: "identity.url",
                }))?;
            info!(url, "Using hosted identity provider");
            Ok(Arc::new(HostedIdentity::from_env(url)?))
        }
    }
}

/// Wire every service to the store and identity provider.
pub fn services(config: &Config, store: SqliteStore) -> Result<Services> {
    let identity = identity_provider(config)?;
    Ok(Services::new(
        Arc::new(store),
        identity,
        Clock::system(),
        AttendancePolicy::from(&config.attendance),
    ))
}

/// Expire overdue packages every `every`, starting immediately.
pub fn spawn_expiration_sweep(packages: PackageService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = packages.expire_overdue().await {
                error!(error = %e, "Expiration sweep failed");
            }
        }
    })
}

/// Serve the HTTP API until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let store = open_store(&config)?;
    let services = services(&config, store)?;

    let sweep = config.sweep.interval().map(|every| {
        info!(interval_secs = every.as_secs(), "Expiration sweep enabled");
        spawn_expiration_sweep(services.packages.clone(), every)
    });

    if config.admin_token.is_none() {
        warn!("STUDIODESK_ADMIN_TOKEN is not set; admin endpoints are unauthenticated");
    }
    let state = AppState::new(services, config.admin_token.clone());
    let app = http::router(state, config.server.cors_permissive);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "studiodesk listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await;

    if let Some(handle) = sweep {
        handle.abort();
    }
    served?;
    info!("studiodesk stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_db(dir: &tempfile::TempDir) -> Config {
        Config {
            database: dir.path().join("boot.db").display().to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn open_store_migrates_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_db(&dir);
        open_store(&config).unwrap();
        // Second open finds nothing to apply.
        let pool = create_pool(&config.database).unwrap();
        assert_eq!(run_migrations(&pool).unwrap(), 0);
    }

    #[test]
    fn hosted_provider_needs_a_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_db(&dir);
        config.identity.provider = IdentityProviderKind::Hosted;
        assert!(matches!(
            identity_provider(&config),
            Err(Error::Config(ConfigError::MissingField { .. }))
        ));
    }

    #[tokio::test]
    async fn local_services_start() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_db(&dir);
        let store = open_store(&config).unwrap();
        let services = services(&config, store).unwrap();
        assert!(services.catalog.list_businesses().await.unwrap().is_empty());
    }
}
