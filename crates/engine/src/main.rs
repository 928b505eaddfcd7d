//! Questline Engine - Main entry point.
//!
//! Loads definitions and the local progress document, hydrates from the
//! remote store when a user is configured, prints the derived summary, then
//! keeps syncing until interrupted.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use questline_domain::Catalog;
use questline_engine::infrastructure::{
    auth::SessionAuth, clock::SystemClock, config::SyncConfig, ports::AuthPort,
    sqlite_store::SqliteRemoteStore,
};
use questline_engine::stores::LocalProgressStore;
use questline_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "questline_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Questline Engine");

    // Load configuration
    let config = SyncConfig::from_env();
    let db_path = std::env::var("QUESTLINE_DB").unwrap_or_else(|_| "questline.db".into());
    let user_id = std::env::var("QUESTLINE_USER_ID").ok();
    let catalog_path = std::env::var("QUESTLINE_CATALOG").ok();
    let progress_path = std::env::var("QUESTLINE_PROGRESS").ok();

    let clock = Arc::new(SystemClock::new());
    let remote = Arc::new(SqliteRemoteStore::new(&db_path, clock).await?);
    tracing::info!(db = %db_path, table = %config.table, "Remote store ready");

    let auth = Arc::new(SessionAuth::from_identity(user_id));
    let catalog = load_catalog(catalog_path.as_deref()).await?;
    let progress = load_progress(progress_path.as_deref()).await?;

    let app = App::new(progress, catalog, remote, auth.clone(), config);

    if auth.session().authenticated_user().is_some() {
        let gateway = &app.use_cases.sync.gateway;
        // Failures are logged by the gateway; local state stays authoritative.
        let _ = gateway.hydrate().await;
        let _ = gateway.listen().await;
    } else {
        tracing::warn!("QUESTLINE_USER_ID not set, running offline");
    }
    let _push_loop = app.use_cases.sync.gateway.start_push_loop();

    print_summary(&app).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down, flushing progress");
    if let Err(e) = app.use_cases.sync.gateway.push_now().await {
        tracing::error!(error = %e, "Final flush failed");
    }

    Ok(())
}

async fn load_catalog(path: Option<&str>) -> anyhow::Result<Catalog> {
    let Some(path) = path else {
        tracing::warn!("QUESTLINE_CATALOG not set, starting with no definitions");
        return Ok(Catalog::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading definitions from {path}"))?;
    let catalog: Catalog =
        serde_json::from_str(&raw).with_context(|| format!("parsing definitions in {path}"))?;
    tracing::info!(
        quests = catalog.quests.len(),
        stations = catalog.stations.len(),
        traders = catalog.traders.len(),
        "Loaded definitions"
    );
    Ok(catalog)
}

async fn load_progress(path: Option<&str>) -> anyhow::Result<LocalProgressStore> {
    let Some(path) = path else {
        return Ok(LocalProgressStore::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading progress from {path}"))?;
    let document: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing progress in {path}"))?;
    Ok(LocalProgressStore::from_document(document)?)
}

async fn print_summary(app: &App) -> anyhow::Result<()> {
    let queries = &app.use_cases.progress.queries;
    let stats = queries.dashboard().await;
    tracing::info!(
        edition = %queries.edition_title().await,
        available = stats.available_tasks,
        completed = stats.completed_tasks,
        total = stats.total_tasks,
        kappa = stats.completed_kappa_tasks,
        "Progress summary"
    );

    let snapshot = queries.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&serde_json::json!({
        "dashboard": stats,
        "derived": snapshot,
    }))?);
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
