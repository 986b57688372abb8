// ============================================================================
// Event Sourcing Store - Event Sinks
// ============================================================================
//
// Generic over the event type. The in-memory log is the only implementation
// shipped here; durable sinks live with the embedding application.
//
// ============================================================================

pub mod event_log;

pub use event_log::{EventSink, InMemoryEventLog};
