//! Prometheus metrics for record invocations.
//!
//! Metric names follow `cc_<metric>_<unit>`.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;
use std::time::Instant;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Invocations by function and outcome (`ok` or an error kind name)
    pub static ref INVOCATIONS: CounterVec = CounterVec::new(
        Opts::new("cc_invocations_total", "Total record invocations"),
        &["function", "outcome"]
    ).expect("metric creation failed");

    /// Invocation latency by function
    pub static ref INVOCATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "cc_invocation_duration_seconds",
            "Time spent handling one invocation"
        ).buckets(exponential_buckets(0.00005, 2.0, 14).expect("valid buckets")),
        &["function"]
    ).expect("metric creation failed");
}

static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    REGISTERED
        .get_or_init(|| {
            let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
                Box::new(INVOCATIONS.clone()),
                Box::new(INVOCATION_DURATION.clone()),
            ];
            for metric in metrics {
                REGISTRY.register(metric).map_err(|e| e.to_string())?;
            }
            Ok(())
        })
        .clone()
        .map_err(TelemetryError::MetricsInit)
}

/// Count one finished invocation and observe its latency.
pub fn record_invocation(function: &str, outcome: &str, seconds: f64) {
    INVOCATIONS.with_label_values(&[function, outcome]).inc();
    INVOCATION_DURATION
        .with_label_values(&[function])
        .observe(seconds);
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Measures one invocation; call [`finish`](Self::finish) with the outcome.
pub struct InvocationTimer {
    function: String,
    start: Instant,
}

impl InvocationTimer {
    /// Start timing `function`.
    pub fn start(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            start: Instant::now(),
        }
    }

    /// Record the invocation with `outcome`.
    pub fn finish(self, outcome: &str) {
        record_invocation(&self.function, outcome, self.start.elapsed().as_secs_f64());
    }
}
