// ============================================================================
// order_fsm - Order lifecycle as an explicit finite state machine
// ============================================================================
//
// - domain:          Order context, status transition policy, commands, events
// - event_sourcing:  event envelopes and sinks for lifecycle events
// - provenance:      injected clock and current-user collaborators
// - metrics:         Prometheus counters for accepted/rejected transitions
// - config:          environment-driven settings for the binary
//
// ============================================================================

pub mod config;
pub mod domain;
pub mod event_sourcing;
pub mod metrics;
pub mod provenance;

pub use domain::order::{
    AmendOrderLineCommand, Order, OrderBuilder, OrderCommand, OrderCommandHandler, OrderDetails,
    OrderError, OrderEvent, OrderIdentifier, OrderLine, OrderLineIdentifier, OrderOperation,
    OrderStatus,
};
