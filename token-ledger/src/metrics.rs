//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger host.
//!
//! # Metrics
//!
//! - `token_operations_committed_total{operation}` - Calls that committed
//! - `token_operations_rejected_total{operation,reason}` - Calls that were rejected
//! - `token_records_emitted_total` - Observation records returned to callers

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
///
/// Collectors live in an owned registry, so independent ledgers (and tests)
/// never collide on metric names.
#[derive(Clone)]
pub struct Metrics {
    /// Committed calls by operation
    pub committed: IntCounterVec,

    /// Rejected calls by operation and error kind
    pub rejected: IntCounterVec,

    /// Records emitted
    pub records: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let committed = IntCounterVec::new(
            Opts::new("token_operations_committed_total", "Calls that committed"),
            &["operation"],
        )?;
        registry.register(Box::new(committed.clone()))?;

        let rejected = IntCounterVec::new(
            Opts::new("token_operations_rejected_total", "Calls that were rejected"),
            &["operation", "reason"],
        )?;
        registry.register(Box::new(rejected.clone()))?;

        let records = IntCounter::new(
            "token_records_emitted_total",
            "Observation records returned to callers",
        )?;
        registry.register(Box::new(records.clone()))?;

        Ok(Self {
            committed,
            rejected,
            records,
            registry,
        })
    }

    /// Record a committed call
    pub fn record_commit(&self, operation: &str, record_count: usize) {
        self.committed.with_label_values(&[operation]).inc();
        self.records.inc_by(record_count as u64);
    }

    /// Record a rejected call
    pub fn record_rejection(&self, operation: &str, reason: &str) {
        self.rejected.with_label_values(&[operation, reason]).inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("records", &self.records.get())
            .field("families", &self.registry.gather().len())
            .finish()
    }
}
