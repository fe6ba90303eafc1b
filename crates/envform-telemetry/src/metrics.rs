//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Counts HTTP traffic, configuration store operations and filter
//!   separator repairs; nothing else is tracked.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Configuration store operation recorded in `config_store_ops_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// Reading the configuration file.
    Load,
    /// Writing the configuration file.
    Save,
}

impl StoreOp {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Save => "save",
        }
    }
}

/// Result label for a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The operation completed.
    Ok,
    /// The operation failed.
    Error,
}

impl StoreOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    config_store_ops_total: IntCounterVec,
    filter_separator_changes_total: IntCounter,
    filter_separator_exhausted_total: IntCounter,
}

/// Snapshot of the filter repair counters for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Times a filter edit forced a new separator.
    pub filter_separator_changes_total: u64,
    /// Times no unused separator could be found.
    pub filter_separator_exhausted_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let config_store_ops_total = counter_vec(
            "config_store_ops_total",
            "Configuration store operations by outcome",
            &["op", "outcome"],
        )?;
        let filter_separator_changes_total = counter(
            "filter_separator_changes_total",
            "Filter edits that required a new separator",
        )?;
        let filter_separator_exhausted_total = counter(
            "filter_separator_exhausted_total",
            "Filter edits where every candidate separator was in use",
        )?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "config_store_ops_total", &config_store_ops_total)?;
        register(
            &registry,
            "filter_separator_changes_total",
            &filter_separator_changes_total,
        )?;
        register(
            &registry,
            "filter_separator_exhausted_total",
            &filter_separator_exhausted_total,
        )?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                config_store_ops_total,
                filter_separator_changes_total,
                filter_separator_exhausted_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Record the outcome of a configuration store operation.
    pub fn record_store_op(&self, op: StoreOp, outcome: StoreOutcome) {
        self.inner
            .config_store_ops_total
            .with_label_values(&[op.as_str(), outcome.as_str()])
            .inc();
    }

    /// Increment the separator change counter.
    pub fn inc_separator_change(&self) {
        self.inner.filter_separator_changes_total.inc();
    }

    /// Increment the separator exhaustion counter.
    pub fn inc_separator_exhausted(&self) {
        self.inner.filter_separator_exhausted_total.inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the filter repair counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filter_separator_changes_total: self.inner.filter_separator_changes_total.get(),
            filter_separator_exhausted_total: self.inner.filter_separator_exhausted_total.get(),
        }
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn counter(name: &'static str, help: &str) -> Result<IntCounter> {
    IntCounter::with_opts(Opts::new(name, help))
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}
