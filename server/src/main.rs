//! Todo list HTTP server.
//!
//! Connects to `PostgreSQL`, applies migrations, seeds the configured users
//! and serves the REST API plus a Prometheus `/metrics` endpoint.

mod config;

use anyhow::Context;
use axum::routing::get;
use config::{SeedUser, ServerConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use todo_list_core::{Clock, SystemClock, TodoService, User, UserRepository};
use todo_list_postgres::{PostgresTodoRepository, PostgresUserRepository, run_migrations};
use todo_list_web::{AppState, todo_router};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    init_tracing();

    info!("Starting todo list server");

    let config = ServerConfig::from_env()?;
    info!(
        address = %config.socket_addr(),
        max_connections = config.database_max_connections,
        default_user = %config.default_user,
        "Configuration loaded"
    );

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    run_migrations(&pool).await?;
    info!("Migrations applied");

    let users = PostgresUserRepository::new(pool.clone());
    seed_users(&users, &config.seed_users).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = TodoService::new(users, PostgresTodoRepository::new(pool), clock)
        .with_default_username(config.default_user.clone());

    let app = todo_router(AppState::new(service)).route(
        "/metrics",
        get(move || {
            let handle = metrics_handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "todo_list_server=info,todo_list_web=info,todo_list_postgres=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Insert each configured user that does not exist yet.
async fn seed_users(users: &PostgresUserRepository, seeds: &[SeedUser]) -> anyhow::Result<()> {
    for seed in seeds {
        if users.find_by_username(&seed.username).await?.is_some() {
            continue;
        }
        let user = users
            .insert_user(&User::new(&seed.username, &seed.email, SystemClock.now()))
            .await?;
        info!(username = %user.username, user_id = %user.id, "Seeded user");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
