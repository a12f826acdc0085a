use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use auditing::config::Configuration;
use auditing::telemetry;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // export traces and logs only when a collector is configured.
    let otlp = std::env::var_os(OTLP_ENDPOINT).is_some();
    let logging = if otlp {
        let provider = telemetry::setup_tracer().map_err(|e| e as Box<dyn std::error::Error>)?;
        opentelemetry::global::set_tracer_provider(provider);
        Some(telemetry::setup_logging().map_err(|e| e as Box<dyn std::error::Error>)?)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .with(logging)
        .init();

    let config = Configuration::default()
        .path(std::env::var("CONFIG_PATH").map(PathBuf::from).unwrap_or_default())
        .read()?;

    let metrics = telemetry::setup_metrics_recorder()?;
    let state = auditing::initialize_state(config.clone())
        .await?
        .with_metrics(metrics);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, version = config.version, "server started");

    axum::serve(listener, auditing::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for ctrl+c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(err) => tracing::error!(error = %err, "cannot listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}
