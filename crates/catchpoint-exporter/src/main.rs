use anyhow::Result;
use catchpoint_collector::Collector;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod app;
mod config;

use config::ExporterConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("catchpoint_exporter=info".parse()?)
                .add_directive("catchpoint_collector=info".parse()?),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/exporter.toml".to_string());
    let config = ExporterConfig::load(&config_path)?;

    tracing::info!(
        http_port = config.http_port,
        telemetry_path = %config.telemetry_path,
        node_count = config.node_ids.len(),
        request_delay_secs = config.request_delay_secs,
        "catchpoint-exporter starting"
    );

    let collector = Arc::new(Collector::new(&config.collector_config())?);
    let app = app::build_app(collector, &config.telemetry_path);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(http = %addr, "Exporter started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    tracing::info!("Exporter stopped");
    Ok(())
}
