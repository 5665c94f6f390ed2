use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use causaldb_api::app::{self, services::AppServices};
use causaldb_infra::{EventStore, LoadPolicy, StoreConfig, StoreOverrides};

#[derive(Debug, Parser)]
#[command(name = "causaldb-api", about = "HTTP façade for the causal event store")]
struct Args {
    /// Event file to open (created if missing).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Maximum number of events mirrored in memory.
    #[arg(long)]
    capacity: Option<usize>,

    /// Table load policy: `prefix` or `full`.
    #[arg(long)]
    load_policy: Option<LoadPolicy>,

    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Directory served for non-API paths.
    #[arg(long, default_value = "frontend")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    causaldb_observability::init();

    let args = Args::parse();
    let config = StoreConfig::from_env().with_overrides(StoreOverrides {
        path: args.db,
        table_capacity: args.capacity,
        load_policy: args.load_policy,
    });

    let store = EventStore::open(&config)
        .with_context(|| format!("failed to open {}", config.path.display()))?;
    let services = Arc::new(AppServices::new(store, args.static_dir));

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
