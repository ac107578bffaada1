//! Prometheus metrics.

use axum::{body::Body, http::Request, http::StatusCode, response::Response};
use lazy_static::lazy_static;
use prometheus::{self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use tracing::Span;

lazy_static! {
    // Registry for holding metric state
    pub static ref REGISTRY: Registry = Registry::new();
    // Request counter by method
    pub static ref INCOMING_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("incoming_requests", "The number of HTTP requests received"),
        &["http_method"]
    ).unwrap();
    // Response counter by status code
    pub static ref RESPONSE_CODE_COLLECTOR: IntCounterVec = IntCounterVec::new(
        Opts::new("outgoing_response", "The number of responses sent."),
        &["status_code"]
    ).unwrap();
    // Response time histogram
    pub static ref RESPONSE_TIME_COLLECTOR: HistogramVec = HistogramVec::new(
        HistogramOpts{
            common_opts: Opts::new("response_time", "The time taken to respond to each request"),
            buckets: prometheus::DEFAULT_BUCKETS.to_vec(),
        },
        &[],
    ).unwrap();
    // Chart renders by view and outcome
    pub static ref CHART_RENDERS: IntCounterVec = IntCounterVec::new(
        Opts::new("chart_renders", "The number of chart documents rendered"),
        &["view", "outcome"]
    ).unwrap();
}

/// Register all collectors with [REGISTRY]. Call once at startup.
pub fn register_metrics() {
    let collectors: [Box<dyn prometheus::core::Collector>; 4] = [
        Box::new(INCOMING_REQUESTS.clone()),
        Box::new(RESPONSE_CODE_COLLECTOR.clone()),
        Box::new(RESPONSE_TIME_COLLECTOR.clone()),
        Box::new(CHART_RENDERS.clone()),
    ];
    for collector in collectors {
        if let Err(err) = REGISTRY.register(collector) {
            tracing::warn!("failed to register metric: {}", err);
        }
    }
}

/// Render all registered metrics in the Prometheus text format.
pub async fn metrics_handler() -> Result<String, (StatusCode, String)> {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    String::from_utf8(buffer).map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}

/// Increments the prometheus counter on all incoming requests, labelled by http method
pub fn request_counter(request: &Request<Body>, _span: &Span) {
    INCOMING_REQUESTS
        .with_label_values(&[&request.method().to_string().to_ascii_uppercase()])
        .inc();
}

/// Increment the prometheus counter on all outgoing responses, labelled by status code
pub fn record_response_metrics<B>(
    response: &Response<B>,
    latency: std::time::Duration,
    _span: &Span,
) {
    RESPONSE_CODE_COLLECTOR
        .with_label_values(&[response.status().as_str()])
        .inc();

    RESPONSE_TIME_COLLECTOR
        .with_label_values(&[])
        .observe(latency.as_secs_f64());
}

/// Count a chart render, labelled by view and whether it succeeded
pub fn record_render(view: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    CHART_RENDERS.with_label_values(&[view, outcome]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_render_counts_by_outcome() {
        let ok = CHART_RENDERS.with_label_values(&["test_view", "ok"]).get();
        let error = CHART_RENDERS.with_label_values(&["test_view", "error"]).get();
        record_render("test_view", true);
        record_render("test_view", false);
        record_render("test_view", false);
        assert_eq!(
            CHART_RENDERS.with_label_values(&["test_view", "ok"]).get(),
            ok + 1
        );
        assert_eq!(
            CHART_RENDERS
                .with_label_values(&["test_view", "error"])
                .get(),
            error + 2
        );
    }

    #[tokio::test]
    async fn handler_renders_registered_metrics() {
        register_metrics();
        record_render("handler_view", true);
        let text = metrics_handler().await.unwrap();
        assert!(text.contains("chart_renders{outcome=\"ok\",view=\"handler_view\"}"));
    }
}
