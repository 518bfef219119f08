//! Report-builder API server.
//!
//! Loads a JSON dataset document (table schemas plus rows), opens the
//! saved-query store, and serves the admin API.

use std::sync::Arc;

use clap::Parser;

use tabula::catalog::{SessionCatalog, StaticSchemaProvider};
use tabula::config::Settings;
use tabula::exec::Dataset;
use tabula::store::SqliteQueryStore;
use tabula::web::{serve, AppState};

#[derive(Parser)]
#[command(name = "tabula", about = "Report builder API server", version)]
struct Cli {
    /// Path to the config file (defaults to ./tabula.toml when present)
    #[arg(long)]
    config: Option<String>,

    /// Path to the JSON dataset document (overrides the config)
    #[arg(long)]
    dataset: Option<String>,

    /// Port to listen on (overrides the config)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    let dataset_path = match cli.dataset {
        Some(path) => path,
        None => settings
            .dataset
            .resolved_path()?
            .ok_or("no dataset configured: pass --dataset or set [dataset] path")?
            .display()
            .to_string(),
    };

    let dataset = Dataset::load(&dataset_path)?;
    let (tables, source) = dataset.into_source();
    tracing::info!(path = %dataset_path, tables = tables.len(), "dataset loaded");

    let catalog = SessionCatalog::new(Arc::new(StaticSchemaProvider::new(tables)));
    let store = match settings.store.resolved_path()? {
        Some(path) => SqliteQueryStore::open_at(path)?,
        None => SqliteQueryStore::open()?,
    };

    let state = Arc::new(AppState::new(catalog, Arc::new(source), store, settings));
    serve(state).await
}
