//! Vitrine - Multilingual portfolio site with an administrative back office

use anyhow::Result;
use chrono::Duration;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use vitrine_auth::{AuthGate, PermissionCache, SessionConfig, SessionIssuer, permission};
use vitrine_core::ContentService;
use vitrine_db::{Database, NewUser};
use vitrine_web::{AppState, DbRoleDirectory, DbUserStore, create_router};

/// Vitrine - Multilingual portfolio site server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "VITRINE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "VITRINE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting Vitrine v{}", env!("CARGO_PKG_VERSION"));

    if config.has_default_secret() {
        warn!("Signing secret is the shipped default; set [auth].secret before going live");
    }

    // Initialize database
    if let Some(parent) = std::path::Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url).await?;

    seed_defaults(&db).await?;

    // Session issuance
    let session_config = SessionConfig {
        secret: config.auth.secret.clone(),
        cookie_name: config.auth.cookie_name.clone(),
        access_ttl: Duration::seconds(config.auth.access_ttl_secs),
        refresh_ttl: Duration::seconds(config.auth.refresh_ttl_secs),
        secure_cookies: config.auth.secure_cookies,
    };
    let issuer = SessionIssuer::new(session_config);

    // Authentication gate over its database-backed collaborators
    let permissions = PermissionCache::new(
        Arc::new(DbRoleDirectory::new(db.clone())),
        Duration::seconds(config.auth.permission_ttl_secs),
    );
    let gate = Arc::new(AuthGate::new(
        issuer.clone(),
        Arc::new(DbUserStore::new(db.clone())),
        permissions,
    ));

    // Content service
    let content = ContentService::new(db.clone());

    // Create application state
    let state = AppState::new(
        db,
        content,
        gate,
        issuer,
        config.site.default_language.clone(),
    );

    // Create router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Seed roles, languages, and a first admin account on an empty database.
async fn seed_defaults(db: &Database) -> Result<()> {
    if !db.has_roles().await? {
        info!("Seeding default roles");
        db.upsert_role(1, "Admin", permission::ALL).await?;
        db.upsert_role(
            2,
            "Editor",
            permission::VIEW_PROJECTS
                | permission::EDIT_PROJECTS
                | permission::VIEW_PROFILE
                | permission::EDIT_PROFILE,
        )
        .await?;
    }

    if db.active_languages().await?.is_empty() {
        info!("Seeding default languages");
        db.upsert_language("fr", "Français", true).await?;
        db.upsert_language("en", "English", true).await?;
    }

    // Create default admin user if no users exist
    if !db.has_users().await? {
        info!("Creating default admin user");
        let password_hash = vitrine_auth::hash_password("admin")?;
        db.insert_user(NewUser {
            email: "admin@vitrine.local".to_string(),
            password_hash,
            first_name: "Site".to_string(),
            last_name: "Admin".to_string(),
            acctype: 1,
        })
        .await?;
        info!("Default admin user created (email: admin@vitrine.local, password: admin)");
    }

    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
