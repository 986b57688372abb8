use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use anyhow::Result;

// ============================================================================
// Event Envelope - Event Metadata
// ============================================================================
//
// Wraps a domain event with identity, ordering and provenance. The timestamp
// and actor are supplied by the caller so that envelopes are reproducible.
//
// ============================================================================

/// Generic Event Envelope - wraps any domain event with metadata
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventEnvelope<E> {
    // Event Identity
    pub event_id: Uuid,
    pub aggregate_id: Uuid,
    pub aggregate_type: String,
    pub sequence_number: i64,

    // Event Type Information
    pub event_type: String,
    pub event_version: i32,

    // Event Payload
    pub event_data: E,

    // Causation & Correlation
    pub causation_id: Option<Uuid>,
    pub correlation_id: Uuid,

    // Actor Information
    pub user_id: Option<Uuid>,

    // Timing
    pub timestamp: DateTime<Utc>,

    pub metadata: HashMap<String, String>,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        aggregate_id: Uuid,
        aggregate_type: impl Into<String>,
        sequence_number: i64,
        event_type: impl Into<String>,
        event_data: E,
        correlation_id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            event_type: event_type.into(),
            event_version: 1,
            event_data,
            causation_id: None,
            correlation_id,
            user_id: None,
            timestamp,
            metadata: HashMap::new(),
        }
    }

    pub fn with_user(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Domain Event Trait
// ============================================================================

/// Every event type handed to an event sink implements this
pub trait DomainEvent: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync {
    fn event_type() -> &'static str where Self: Sized;
}

// ============================================================================
// Event Serialization Helpers
// ============================================================================

pub fn serialize_event<E: Serialize>(event: &E) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

pub fn deserialize_event<E: for<'de> Deserialize<'de>>(json: &str) -> Result<E> {
    Ok(serde_json::from_str(json)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct TestEvent {
        data: String,
    }

    impl DomainEvent for TestEvent {
        fn event_type() -> &'static str { "TestEvent" }
    }

    #[test]
    fn test_event_envelope_creation() {
        let aggregate_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let envelope = EventEnvelope::new(
            aggregate_id,
            "Order",
            1,
            TestEvent::event_type(),
            TestEvent { data: "test".to_string() },
            correlation_id,
            timestamp,
        )
        .with_user(Some(user_id))
        .with_metadata("source", "unit-test");

        assert_eq!(envelope.aggregate_id, aggregate_id);
        assert_eq!(envelope.aggregate_type, "Order");
        assert_eq!(envelope.sequence_number, 1);
        assert_eq!(envelope.event_type, "TestEvent");
        assert_eq!(envelope.correlation_id, correlation_id);
        assert_eq!(envelope.user_id, Some(user_id));
        assert_eq!(envelope.timestamp, timestamp);
        assert_eq!(envelope.metadata.get("source").map(String::as_str), Some("unit-test"));
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = EventEnvelope::new(
            Uuid::new_v4(),
            "Order",
            3,
            "TestEvent",
            TestEvent { data: "test data".to_string() },
            Uuid::new_v4(),
            Utc::now(),
        );

        let json = serialize_event(&envelope).unwrap();
        let deserialized: EventEnvelope<TestEvent> = deserialize_event(&json).unwrap();

        assert_eq!(envelope, deserialized);
    }
}
