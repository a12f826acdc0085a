//! Telemetry logic.
//! Support tracing, metrics and logging.
use axum::extract::{MatchedPath, Request, State};
use axum::http::{StatusCode, Version};
use axum::middleware::Next;
use axum::response::IntoResponse;
use metrics::{Unit, gauge};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::trace::{Span, Tracer};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::LogExporter;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::{SdkLogger, SdkLoggerProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};
use tokio::time::sleep;

use std::time::{Duration, Instant};

use crate::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");
const PROCESS_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUESTS_DURATION: &str = "http_requests_duration_seconds";
pub const ACCOUNTS_CREATED_TOTAL: &str = "accounts_created_total";

/// OpenTelemetry resource describing this service.
fn service_resource() -> Resource {
    Resource::builder().with_service_name(SERVICE_NAME).build()
}

/// Create tracer for OTLP.
///
/// The endpoint is read from `OTEL_EXPORTER_OTLP_ENDPOINT`.
pub fn setup_tracer() -> Result<SdkTracerProvider, BoxError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(service_resource())
        .build())
}

/// Bridge `tracing` events to an OTLP log exporter.
pub fn setup_logging()
-> Result<OpenTelemetryTracingBridge<SdkLoggerProvider, SdkLogger>, BoxError> {
    let exporter = LogExporter::builder().with_tonic().build()?;
    let provider: SdkLoggerProvider = SdkLoggerProvider::builder()
        .with_resource(service_resource())
        .with_batch_exporter(exporter)
        .build();
    Ok(OpenTelemetryTracingBridge::new(&provider))
}

/// Install the global Prometheus recorder and start sampling the process.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    const LATENCY_BUCKETS: &[f64] = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    metrics::describe_gauge!(
        "process_cpu_usage",
        Unit::Percent,
        "CPU usage of the process in percentage."
    );
    metrics::describe_gauge!(
        "process_memory_used_bytes",
        Unit::Bytes,
        "Total process memory in bytes."
    );
    metrics::describe_counter!(
        ACCOUNTS_CREATED_TOTAL,
        Unit::Count,
        "Accounts successfully created."
    );
    metrics::describe_counter!(HTTP_REQUESTS_TOTAL, Unit::Count, "Requests served.");
    metrics::describe_histogram!(
        HTTP_REQUESTS_DURATION,
        Unit::Seconds,
        "Time spent serving a request."
    );

    tokio::spawn(sample_process());

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUESTS_DURATION.to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()
}

async fn sample_process() {
    let mut system = System::new_with_specifics(RefreshKind::nothing());
    let pid = Pid::from_u32(std::process::id());

    loop {
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );

        if let Some(process) = system.process(pid) {
            gauge!("process_memory_used_bytes").set(process.memory() as f64);
            gauge!("process_cpu_usage").set(process.cpu_usage() as f64);
        }

        sleep(PROCESS_REFRESH_INTERVAL).await;
    }
}

/// `GET /metrics`, or `404` when no recorder was installed.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::default()),
    }
}

fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "UNKNOWN",
    }
}

/// Route template when matched, so `path` labels stay bounded.
fn route_path(req: &Request) -> String {
    match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    }
}

/// Record a span, a counter and a latency histogram per request.
pub async fn track(req: Request, next: Next) -> impl IntoResponse {
    let mut span = global::tracer(SERVICE_NAME).start("http-request");

    let start = Instant::now();
    let path = route_path(&req);
    let method = req.method().to_string();
    let version = http_version(req.version());

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    span.set_attributes([
        KeyValue::new("version", version),
        KeyValue::new("path", path.clone()),
        KeyValue::new("method", method.clone()),
        KeyValue::new("status", status.clone()),
    ]);

    let labels = [("method", method), ("path", path), ("status", status)];
    metrics::counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
    metrics::histogram!(HTTP_REQUESTS_DURATION, &labels).record(latency);

    span.end();

    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::Method;

    use super::*;
    use crate::config::Configuration;
    use crate::router::create::tests::{Behaviour, MockService};
    use crate::{app, make_request};

    #[test]
    fn test_http_version() {
        assert_eq!(http_version(Version::HTTP_11), "HTTP/1.1");
        assert_eq!(http_version(Version::HTTP_2), "HTTP/2");
    }

    #[test]
    fn test_route_path_falls_back_to_uri() {
        let req = Request::builder()
            .uri("/accounts?page=2")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(route_path(&req), "/accounts");
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let state = AppState::new(
            Arc::new(Configuration::default()),
            Arc::new(MockService::new(Behaviour::Fail)),
        );

        let response =
            make_request(app(state), Method::GET, "/metrics", String::default()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
