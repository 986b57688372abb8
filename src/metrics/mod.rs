use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::domain::order::{OrderOperation, OrderStatus};

// ============================================================================
// Metrics Module - Prometheus metrics for order transitions
// ============================================================================
//
// Provides:
// - accepted transitions, by operation and resulting status
// - rejected operations, by operation and the status that refused them
//
// ============================================================================

pub struct TransitionMetrics {
    registry: Registry,

    pub transitions_accepted: IntCounterVec,
    pub transitions_rejected: IntCounterVec,
}

impl TransitionMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let transitions_accepted = IntCounterVec::new(
            Opts::new("order_transitions_accepted_total", "Total accepted order operations"),
            &["operation", "from_status", "to_status"],
        )?;
        registry.register(Box::new(transitions_accepted.clone()))?;

        let transitions_rejected = IntCounterVec::new(
            Opts::new("order_transitions_rejected_total", "Total rejected order operations"),
            &["operation", "status", "reason"],
        )?;
        registry.register(Box::new(transitions_rejected.clone()))?;

        Ok(Self {
            registry,
            transitions_accepted,
            transitions_rejected,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_accepted(&self, operation: OrderOperation, from: OrderStatus, to: OrderStatus) {
        self.transitions_accepted
            .with_label_values(&[operation.as_str(), from.as_str(), to.as_str()])
            .inc();
    }

    /// `reason` is a short label such as `illegal_state`
    pub fn record_rejected(&self, operation: OrderOperation, status: OrderStatus, reason: &str) {
        self.transitions_rejected
            .with_label_values(&[operation.as_str(), status.as_str(), reason])
            .inc();
    }

    /// Render every registered metric in the Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
