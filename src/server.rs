//! Server runtime: wiring, bootstrap and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{FileStorage, UserService};
use crate::config::{AppConfig, StorageBackend, StorageConfig};
use crate::domain::{CreateUserDto, DomainResult, InfraError, UserRole};
use crate::infrastructure::crypto::{JwtAuthIssuer, JwtConfig, PasswordHasher};
use crate::infrastructure::database::entities::user;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::{init_database, DatabaseConfig, SeaOrmUserRepository};
use crate::infrastructure::storage::{InMemoryFileStorage, LocalFileStorage};
use crate::interfaces::http::{create_api_router, ApiContext};

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup.
    pub auto_migrate: bool,
    /// Create the configured admin account when the users table is empty.
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

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` wins over `logging.level`. Call once at process startup.
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

/// Install the global Prometheus recorder. Only the first call installs it,
/// later calls reuse the same handle.
pub fn install_metrics_recorder() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

pub fn jwt_config(config: &AppConfig) -> JwtConfig {
    JwtConfig {
        secret: config.security.jwt_secret.clone(),
        expiration_hours: config.security.jwt_expiration_hours,
        ..Default::default()
    }
}

pub fn build_storage(config: &StorageConfig) -> Arc<dyn FileStorage> {
    match config.backend {
        StorageBackend::Local => {
            info!(root = %config.root.display(), "Using local file storage");
            Arc::new(LocalFileStorage::new(config.root.clone()))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory file storage, images are lost on restart");
            Arc::new(InMemoryFileStorage::new())
        }
    }
}

pub fn build_user_service(db: DatabaseConnection, config: &AppConfig) -> Arc<UserService> {
    let hasher = PasswordHasher::new(config.security.bcrypt_cost);
    Arc::new(UserService::new(
        Arc::new(SeaOrmUserRepository::new(db, hasher)),
        build_storage(&config.storage),
        Arc::new(JwtAuthIssuer::new(jwt_config(config))),
        config.storage.user_image_path.clone(),
    ))
}

/// Create the configured admin account if no users exist yet.
pub async fn create_default_admin(
    db: &DatabaseConnection,
    service: &UserService,
    config: &AppConfig,
) -> DomainResult<()> {
    let users_count = user::Entity::find()
        .count(db)
        .await
        .map_err(InfraError::from)?;
    if users_count > 0 {
        return Ok(());
    }

    info!("Creating default admin user...");
    let admin = service
        .create(CreateUserDto {
            username: config.admin.username.clone(),
            email: config.admin.email.clone(),
            password: config.admin.password.clone(),
            role: Some(UserRole::Admin),
            full_name: None,
        })
        .await?;
    service.activate(&admin.id).await?;

    info!(email = %admin.email, "Default admin created");
    warn!("Please change the admin password immediately!");
    Ok(())
}

/// Resolve when SIGTERM or SIGINT (Ctrl+C) arrives.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM signal"),
                    _ = tokio::signal::ctrl_c() => info!("Received SIGINT signal (Ctrl+C)"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    info!("Received Ctrl+C signal");
}

/// Connect, migrate, seed, then serve until a shutdown signal arrives.
pub async fn run(opts: ServerOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = opts.config;
    info!("Starting account service...");

    let prometheus = install_metrics_recorder()?;

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: config.database.connection_url(),
        max_connections: config.database.max_connections,
    };
    let db = init_database(&db_config).await?;

    if opts.auto_migrate {
        info!("Running database migrations...");
        Migrator::up(&db, None).await?;
        info!("Migrations completed");
    }

    // ── Services ───────────────────────────────────────────────
    let user_service = build_user_service(db.clone(), &config);

    if opts.create_default_admin {
        if let Err(e) = create_default_admin(&db, &user_service, &config).await {
            error!(error = %e, "Failed to create admin user");
        }
    }

    // ── REST API ───────────────────────────────────────────────
    let router = create_api_router(ApiContext {
        user_service,
        jwt_config: jwt_config(&config),
        db: db.clone(),
        prometheus,
        max_image_bytes: config.storage.max_image_bytes,
    });

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("REST API server stopped");

    if let Err(e) = db.close().await {
        warn!(error = %e, "Error closing database connection");
    } else {
        info!("Database connection closed");
    }

    info!("Account service shutdown complete");
    Ok(())
}
