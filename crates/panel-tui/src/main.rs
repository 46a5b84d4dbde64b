mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;

use std::time::Duration;

use panel_core::bridge::BridgeClient;
use panel_core::catalog::CatalogSource;
use panel_core::favorites::FavoritesStore;
use panel_core::platform;
use panel_core::profile::ProfileSelector;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("tvpanel.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("tvpanel log: {}", log_path.display());

    tracing::info!("tvpanel starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = panel_core::config::Config::load().unwrap_or_default();

    // ── Collaborators ────────────────────────────────────────────────────────
    let bridge = if config.bridge_configured() {
        Some(BridgeClient::new(
            &config.bridge.base_url,
            &config.bridge.token,
            &config.bridge.entity_id,
        ))
    } else {
        tracing::warn!("no bridge token configured; playback controls are no-ops");
        None
    };

    let catalog_source = CatalogSource::new(config.catalog.url.clone(), config.catalog.cache_bust);
    let favorites_store = FavoritesStore::new(data_dir.clone());
    let profiles = ProfileSelector::load(&data_dir);

    // ── Run the panel ────────────────────────────────────────────────────────
    let app = app::App::new(
        bridge,
        catalog_source,
        favorites_store,
        profiles,
        Duration::from_secs(config.polling.interval_secs.max(1)),
    );
    app.run().await?;

    Ok(())
}
