//! Stockroom server
//!
//! Boots the whole backend: configuration, database connection,
//! migrations for both modules, and the HTTP surface under `/api`.

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::{Extension, Router};
use clap::Parser;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use accounts_service::api::native::NativeClient;
use accounts_service::domain::{Service as AccountsService, TokenCodec};
use accounts_service::infra::storage::migrations::Migrator as AccountsMigrator;
use accounts_service::infra::storage::repositories::{
    SeaOrmActivityRepository, SeaOrmUserRepository,
};
use accounts_service::AuthState;
use inventory_service::domain::Service as InventoryService;
use inventory_service::infra::storage::migrations::Migrator as InventoryMigrator;
use inventory_service::infra::storage::{
    SeaOrmGroupRepository, SeaOrmInvoiceRepository, SeaOrmItemRepository, SeaOrmReportsRepository,
    SeaOrmShopRepository,
};

use crate::config::AppConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "stockroom-server", version, about = "Inventory and sales backend")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "stockroom.yaml")]
    config: PathBuf,

    /// Print the resolved configuration and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    if cli.print_config {
        let mut printable = config.clone();
        if !printable.auth.secret.is_empty() {
            printable.auth.secret = "<redacted>".to_string();
        }
        println!("{}", serde_json::to_string_pretty(&printable)?);
        return Ok(());
    }

    if config.auth.secret.is_empty() {
        anyhow::bail!(
            "auth.secret is empty; set it in the config file or via STOCKROOM_AUTH__SECRET"
        );
    }

    let db = connect(&config).await?;

    info!("running migrations");
    // The inventory schema references the users table, so accounts
    // migrates first.
    AccountsMigrator::up(db.as_ref(), None)
        .await
        .context("accounts migrations failed")?;
    InventoryMigrator::up(db.as_ref(), None)
        .await
        .context("inventory migrations failed")?;

    let tokens = TokenCodec::new(config.auth.secret.as_bytes(), config.auth.token_ttl_days);
    let accounts = Arc::new(AccountsService::new(
        Arc::new(SeaOrmUserRepository::new(db.clone())),
        Arc::new(SeaOrmActivityRepository::new(db.clone())),
        tokens.clone(),
    ));
    let accounts_client = Arc::new(NativeClient::new(accounts.clone()));

    let inventory = Arc::new(InventoryService::new(
        Arc::new(SeaOrmGroupRepository::new(db.clone())),
        Arc::new(SeaOrmItemRepository::new(db.clone())),
        Arc::new(SeaOrmShopRepository::new(db.clone())),
        Arc::new(SeaOrmInvoiceRepository::new(db.clone())),
        Arc::new(SeaOrmReportsRepository::new(db.clone())),
        accounts_client.clone(),
    ));

    let auth = AuthState::new(tokens, accounts_client);
    let app = build_router(accounts, inventory, auth, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<Arc<DatabaseConnection>> {
    let mut options = ConnectOptions::new(config.database.url.clone());
    options
        .max_connections(config.database.max_connections)
        .connect_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("failed to connect to the database")?;
    Ok(Arc::new(db))
}

fn build_router(
    accounts: Arc<AccountsService>,
    inventory: Arc<InventoryService>,
    auth: AuthState,
    config: &AppConfig,
) -> Router {
    let api = Router::new()
        .nest("/user", accounts_service::api::rest::routes::router(accounts))
        .merge(inventory_service::api::rest::router(inventory));

    Router::new()
        .nest("/api", api)
        .layer(Extension(auth))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors_layer(&config.cors.allowed_origins))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let mut origins = Vec::with_capacity(allowed_origins.len());
    for origin in allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => warn!(%origin, "ignoring malformed CORS origin"),
        }
    }
    cors.allow_origin(origins)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
    }
}
