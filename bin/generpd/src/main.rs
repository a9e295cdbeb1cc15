//! `generpd` — the GenERP server binary.
//!
//! Usage:
//!   generpd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/generp/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use generp_audit::AuditModule;
use generp_core::Module;
use generp_fleet::FleetModule;
use generp_kv::{KVStore, RedbStore};

use config::ServerConfig;

/// GenERP server.
#[derive(Parser, Debug)]
#[command(name = "generpd", about = "GenERP server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    std::fs::create_dir_all(&server_config.storage.data_dir)?;
    let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&server_config.db_path())?);
    info!("Storage ready at {}", server_config.db_path().display());

    // Wire up modules. The fleet module reports status changes to the
    // audit module's sink.
    let audit = AuditModule::new(Arc::clone(&kv));
    let fleet = FleetModule::new(Arc::clone(&kv), audit.sink());

    // Seed the fleet if configured.
    if let Some(ref seed_path) = server_config.seed.machines {
        bootstrap::seed_machines(
            fleet.service().store().as_ref(),
            audit.sink().as_ref(),
            Path::new(seed_path),
        )?;
    }

    // Collect module routes and build the router.
    let modules: [&dyn Module; 2] = [&fleet, &audit];
    let module_routes = modules.iter().map(|m| (m.name(), m.routes())).collect();
    let app = routes::build_router(module_routes);

    info!("generpd listening on {}", cli.listen);
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
