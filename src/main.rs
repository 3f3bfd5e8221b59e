//! PairChat server binary.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use pairchat::adapters::http::middleware::AuthState;
use pairchat::adapters::http::{app_router, AppState};
use pairchat::adapters::{InMemoryChatRepository, PostgresChatRepository, ShutdownSignal};
use pairchat::config::{AppConfig, DatabaseConfig};
use pairchat::ports::ChatRepository;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    let repository = connect_repository(&config.database).await?;
    // The token table both authenticates callers and lists them
    let tokens = Arc::new(config.auth.validator()?);
    let validator: AuthState = tokens.clone();
    let shutdown = ShutdownSignal::new();

    let state = AppState::new(repository, validator, tokens, &config.chat, shutdown.clone());
    let registry = state.chat.registry.clone();
    let router = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!(%addr, error = %e, "Failed to bind");
        e
    })?;
    tracing::info!(%addr, environment = ?config.server.environment, "PairChat server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await?;

    // Upgraded sockets outlive the HTTP server; give them time to say goodbye
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while registry.connection_count().await > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            remaining = registry.connection_count().await,
            "Connections still open after shutdown grace period"
        );
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    // set_global_default fails only if a subscriber is already installed
    let _ = if config.is_production() {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

async fn connect_repository(
    database: &DatabaseConfig,
) -> Result<Arc<dyn ChatRepository>, Box<dyn Error>> {
    let Some(url) = database.postgres_url() else {
        tracing::warn!("No database URL configured; using the in-memory store");
        return Ok(Arc::new(InMemoryChatRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .max_lifetime(database.max_lifetime())
        .connect(url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PostgresChatRepository::new(pool)))
}

/// Resolves on Ctrl-C or SIGTERM, after telling every live connection to close.
async fn wait_for_shutdown(shutdown: ShutdownSignal) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown requested; closing live connections");
    shutdown.trigger();
}
