use anyhow::Result;
use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Histogram bucket boundaries for request latency (seconds).
const LATENCY_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Thin handle around the global metrics recorder.
///
/// After `Metrics::install()` the `metrics` crate macros (`counter!`, `gauge!`,
/// `histogram!`) can be used anywhere in the codebase. The `PrometheusHandle`
/// is retained solely for rendering the `/metrics` endpoint.
#[derive(Clone)]
pub struct Metrics {
    handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and register metric descriptions.
    ///
    /// Fails if a global recorder is already installed.
    pub fn install() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                metrics_exporter_prometheus::Matcher::Suffix("_duration_seconds".to_string()),
                LATENCY_BUCKETS,
            )?
            .install_recorder()?;

        // request path
        describe_counter!(
            "wsproxy_requests_total",
            Unit::Count,
            "Total requests by the branch that claimed them (branch=none: 404 fallback)"
        );
        describe_histogram!(
            "wsproxy_request_duration_seconds",
            Unit::Seconds,
            "Request duration including the branch handler"
        );

        // connections
        describe_gauge!(
            "wsproxy_connections_active",
            Unit::Count,
            "Number of active downstream connections"
        );
        describe_counter!(
            "wsproxy_connections_total",
            Unit::Count,
            "Total connections accepted"
        );

        Ok(Self { handle })
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
