pub mod routes;
pub mod state;
pub mod stream;

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mesh_service::MeshService;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = mesh_cli::VERSION,
	rename_all = "kebab",
	styles = mesh_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = mesh_config::load(&args.config)?;
	init_tracing(&config)?;
	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let state = AppState::new(config).await?;

	spawn_purge_task(
		state.service.clone(),
		state.service.cfg.jobs.purge_interval_secs,
	);

	let app = routes::router(state);
	let http_listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");
	axum::serve(http_listener, app).await?;

	Ok(())
}

/// Expired jobs are already invisible to readers; the purge pass just
/// reclaims their rows.
fn spawn_purge_task(service: Arc<MeshService>, interval_secs: u64) {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

		// The first tick completes immediately.
		ticker.tick().await;

		loop {
			ticker.tick().await;

			if let Err(err) = service.purge_expired_jobs().await {
				tracing::warn!(error = %err, "Job purge pass failed.");
			}
		}
	});
}

fn init_tracing(config: &mesh_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();
	Ok(())
}
