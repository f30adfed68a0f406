//! Reusable server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, default admin, REST API, and graceful
//! shutdown.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, UserRole};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::init_database;
use crate::interfaces::http::{create_api_router, ApiContext};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin when the users table is empty (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running clinic service.
///
/// ```rust,no_run
/// use clinic_core::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Port the API is actually bound to.
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Connect, migrate, seed the admin, then serve the REST API.
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting clinic service...");

        let db_config = app_cfg.database_config();
        let jwt_config = app_cfg.jwt_config();
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        // ── Database ───────────────────────────────────────────
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        if opts.create_default_admin {
            let repos = SeaOrmRepositoryProvider::new(db.clone());
            if let Err(e) = ensure_default_admin(&repos, &app_cfg).await {
                error!("Failed to create default admin: {}", e);
            }
        }

        // ── REST API server ────────────────────────────────────
        let ctx = ApiContext::new(
            db.clone(),
            jwt_config,
            app_cfg.security.password_hash_cost,
        );
        let api_router = create_api_router(ctx);

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(app_cfg.api_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            config: app_cfg,
            api_port: local_addr.port(),
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered. In-flight
    /// requests get the configured grace period, then the task is aborted.
    pub async fn wait(self) {
        let grace = self.shutdown.grace_period();
        info!(grace_secs = grace.as_secs(), "Waiting for server tasks to complete...");

        let mut api_task = self.api_task;
        match tokio::time::timeout(grace, &mut api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => {
                warn!("Grace period elapsed, aborting REST API server");
                api_task.abort();
            }
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Clinic service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down clinic service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Create the configured admin if no users exist. Returns whether one was
/// created.
///
/// The account is active and must change its password on first login.
pub async fn ensure_default_admin(
    repos: &dyn RepositoryProvider,
    app_cfg: &AppConfig,
) -> DomainResult<bool> {
    if repos.users().count().await? > 0 {
        return Ok(false);
    }

    info!("Creating default admin user...");
    let admin = &app_cfg.admin;
    let password_hash = hash_password(&admin.password, app_cfg.security.password_hash_cost)
        .map_err(|e| DomainError::Crypto(format!("Failed to hash admin password: {}", e)))?;

    repos
        .users()
        .create(NewUser {
            email: admin.email.clone(),
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            role: UserRole::Admin,
            password_hash,
            is_active: true,
            must_change_password: true,
        })
        .await?;

    info!("Default admin created: {}", admin.email);
    warn!("Please change the admin password immediately!");
    Ok(true)
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AuthService;
    use crate::infrastructure::database::testing::memory_db;

    fn test_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.security.password_hash_cost = 4;
        cfg
    }

    #[tokio::test]
    async fn default_admin_is_seeded_once() {
        let db = memory_db().await;
        let repos = SeaOrmRepositoryProvider::new(db);
        let cfg = test_config();

        assert!(ensure_default_admin(&repos, &cfg).await.unwrap());
        assert!(!ensure_default_admin(&repos, &cfg).await.unwrap());
        assert_eq!(repos.users().count().await.unwrap(), 1);
        assert_eq!(repos.users().count_active_admins().await.unwrap(), 1);

        let admin = repos
            .users()
            .find_by_email(&cfg.admin.email)
            .await
            .unwrap()
            .unwrap();
        assert!(admin.must_change_password);
        assert_eq!(admin.first_name, "System");
    }

    #[tokio::test]
    async fn seeded_admin_can_log_in() {
        let db = memory_db().await;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        let cfg = test_config();
        ensure_default_admin(repos.as_ref(), &cfg).await.unwrap();

        let auth = AuthService::new(repos, cfg.jwt_config(), 4);
        let result = auth
            .login(&cfg.admin.email, &cfg.admin.password)
            .await
            .unwrap();
        assert_eq!(result.user.role, UserRole::Admin);
        assert!(result.must_change_password);
    }

    #[tokio::test]
    async fn server_starts_and_stops() {
        let mut config = test_config();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".into();
        config.database.max_connections = 1;

        let handle = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await
        .unwrap();
        assert!(handle.api_port > 0);
        assert!(handle.is_running());

        handle.shutdown().await;
    }
}
