// ============================================================================
// Event Sourcing Core - Generic Abstractions
// ============================================================================
//
// Nothing in here knows about orders; everything is generic over the event
// type.
//
// ============================================================================

pub mod event;

pub use event::{DomainEvent, EventEnvelope, serialize_event, deserialize_event};
