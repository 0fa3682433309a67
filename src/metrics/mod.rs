use prometheus::{IntCounterVec, IntGauge, Opts, Registry};

// ============================================================================
// Metrics Module - Prometheus metrics for the order store
// ============================================================================
//
// Provides:
// - Store operations by kind (save, find, find_all, delete)
// - Store failures by kind and reason
// - Number of orders currently stored
//
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub store_operations: IntCounterVec,
    pub store_failures: IntCounterVec,
    pub stored_orders: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let store_operations = IntCounterVec::new(
            Opts::new("order_store_operations_total", "Total successful order store operations"),
            &["operation"],
        )?;
        registry.register(Box::new(store_operations.clone()))?;

        let store_failures = IntCounterVec::new(
            Opts::new("order_store_failures_total", "Total failed order store operations"),
            &["operation", "reason"],
        )?;
        registry.register(Box::new(store_failures.clone()))?;

        let stored_orders = IntGauge::new("order_store_orders", "Orders currently stored")?;
        registry.register(Box::new(stored_orders.clone()))?;

        Ok(Self {
            registry,
            store_operations,
            store_failures,
            stored_orders,
        })
    }

    /// Get the Prometheus registry for exposing metrics
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_operation(&self, operation: &str) {
        self.store_operations.with_label_values(&[operation]).inc();
    }

    pub fn record_failure(&self, operation: &str, reason: &str) {
        self.store_failures.with_label_values(&[operation, reason]).inc();
    }

    pub fn set_order_count(&self, count: usize) {
        self.stored_orders.set(count as i64);
    }
}
