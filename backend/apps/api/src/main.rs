//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are
//! `panel::PanelError`, rendered through `kernel::error::AppError`.

use anyhow::Context;
use panel::{
    BackupConfig, PanelConfig, PgClientExpiryRepository, ProtectedRoutes, TelegramBackupNotifier,
    panel_router,
};
use platform::crypto::from_base64;
use platform::telegram::{TelegramClient, TelegramConfig};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:2053";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,panel=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = match env::var("PANEL_DB_MAX_CONNECTIONS") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .context("PANEL_DB_MAX_CONNECTIONS must be a positive integer")?,
        Err(_) => 5,
    };

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!(max_connections, "Connected to database");

    // Panel configuration
    let panel_config = load_panel_config()?;

    let addr: SocketAddr = env::var("PANEL_LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()
        .context("PANEL_LISTEN_ADDR must be a socket address")?;

    // Backup relay
    let notifier = load_backup_notifier(&addr)?;
    if notifier.is_enabled() {
        tracing::info!("Telegram backup relay enabled");
    } else {
        tracing::info!("Telegram backup relay disabled");
    }

    let repo = PgClientExpiryRepository::new(pool);
    let base_path = panel_config.base_path.clone();

    // Build router
    let app = panel_router(repo, notifier, panel_config, ProtectedRoutes::default())
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!(%addr, base_path = %base_path, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn load_panel_config() -> anyhow::Result<PanelConfig> {
    let mut config = match env::var("PANEL_SESSION_SECRET") {
        Ok(secret_b64) => PanelConfig {
            session_secret: decode_session_secret(&secret_b64)?,
            ..PanelConfig::default()
        },
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("PANEL_SESSION_SECRET not set, using a random secret");
            PanelConfig::development()
        }
        Err(_) => anyhow::bail!("PANEL_SESSION_SECRET must be set in production"),
    };

    if let Ok(cookie) = env::var("PANEL_SESSION_COOKIE") {
        let cookie = cookie.trim();
        if !cookie.is_empty() {
            config.session_cookie_name = cookie.to_string();
        }
    }

    let base_path = env::var("PANEL_BASE_PATH").unwrap_or_default();
    Ok(config.with_base_path(&base_path))
}

fn decode_session_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = from_base64(secret_b64.trim()).context("PANEL_SESSION_SECRET must be base64")?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        anyhow::anyhow!(
            "PANEL_SESSION_SECRET must decode to 32 bytes, got {}",
            bytes.len()
        )
    })
}

fn load_backup_notifier(addr: &SocketAddr) -> anyhow::Result<TelegramBackupNotifier> {
    let backup_config = BackupConfig {
        admin_chat_ids: BackupConfig::parse_admin_ids(
            &env::var("TELEGRAM_ADMIN_IDS").unwrap_or_default(),
        )
        .context("TELEGRAM_ADMIN_IDS must be a comma-separated list of chat ids")?,
        files: BackupConfig::parse_files(&env::var("PANEL_BACKUP_FILES").unwrap_or_default()),
        host_label: env::var("HOSTNAME").unwrap_or_else(|_| addr.to_string()),
    };

    let client = match env::var("TELEGRAM_BOT_TOKEN") {
        Ok(token) if !token.trim().is_empty() => {
            let mut config = TelegramConfig::new(token.trim());
            if let Ok(api_url) = env::var("TELEGRAM_API_URL") {
                config.api_url = api_url;
            }
            Some(TelegramClient::new(config).context("failed to build Telegram client")?)
        }
        _ => None,
    };

    Ok(TelegramBackupNotifier::new(client, backup_config))
}
