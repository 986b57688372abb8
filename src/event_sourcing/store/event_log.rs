use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;
use anyhow::{Result, anyhow, bail};

use crate::event_sourcing::core::{DomainEvent, EventEnvelope};

// ============================================================================
// Event Sink - where accepted transitions are handed off
// ============================================================================
//
// Responsibilities:
// 1. Append events (append-only)
// 2. Enforce optimistic concurrency per aggregate
// 3. Load event history for an aggregate
//
// Durable storage and delivery are left to implementations outside this crate.
//
// ============================================================================

pub trait EventSink<E: DomainEvent>: Send + Sync {
    /// Append events and return the new version of the aggregate stream
    fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: Vec<EventEnvelope<E>>,
    ) -> Result<i64>;

    fn current_version(&self, aggregate_id: Uuid) -> Result<i64>;

    fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<EventEnvelope<E>>>;
}

// ============================================================================
// In-Memory Event Log
// ============================================================================

struct LogState<E> {
    events: Vec<EventEnvelope<E>>,
    versions: HashMap<Uuid, i64>,
}

pub struct InMemoryEventLog<E: DomainEvent> {
    aggregate_type_name: String,
    state: Mutex<LogState<E>>,
}

impl<E: DomainEvent> InMemoryEventLog<E> {
    pub fn new(aggregate_type_name: &str) -> Self {
        Self {
            aggregate_type_name: aggregate_type_name.to_string(),
            state: Mutex::new(LogState {
                events: Vec::new(),
                versions: HashMap::new(),
            }),
        }
    }

    /// Every stored event across all aggregates, in append order
    pub fn all_events(&self) -> Result<Vec<EventEnvelope<E>>> {
        let state = self.state.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        Ok(state.events.clone())
    }

    pub fn len(&self) -> Result<usize> {
        let state = self.state.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        Ok(state.events.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<E: DomainEvent> EventSink<E> for InMemoryEventLog<E> {
    fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: Vec<EventEnvelope<E>>,
    ) -> Result<i64> {
        if events.is_empty() {
            bail!("Cannot append empty event list");
        }

        let mut state = self.state.lock().map_err(|_| anyhow!("event log lock poisoned"))?;

        // Check optimistic concurrency
        let current_version = state.versions.get(&aggregate_id).copied().unwrap_or(0);
        if current_version != expected_version {
            bail!(
                "Concurrency conflict: expected version {}, but current is {}",
                expected_version,
                current_version
            );
        }

        if let Some(foreign) = events.iter().find(|e| e.aggregate_id != aggregate_id) {
            bail!(
                "Event {} belongs to aggregate {}, not {}",
                foreign.event_id,
                foreign.aggregate_id,
                aggregate_id
            );
        }

        let mut new_version = expected_version;
        for mut envelope in events {
            new_version += 1;
            envelope.sequence_number = new_version;
            state.events.push(envelope);
        }

        state.versions.insert(aggregate_id, new_version);

        tracing::debug!(
            aggregate_type = %self.aggregate_type_name,
            %aggregate_id,
            new_version,
            "Appended events"
        );

        Ok(new_version)
    }

    fn current_version(&self, aggregate_id: Uuid) -> Result<i64> {
        let state = self.state.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        Ok(state.versions.get(&aggregate_id).copied().unwrap_or(0))
    }

    fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<EventEnvelope<E>>> {
        let state = self.state.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        Ok(state
            .events
            .iter()
            .filter(|envelope| envelope.aggregate_id == aggregate_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct TestEvent {
        value: i32,
    }

    impl DomainEvent for TestEvent {
        fn event_type() -> &'static str { "TestEvent" }
    }

    fn envelope(aggregate_id: Uuid, value: i32) -> EventEnvelope<TestEvent> {
        EventEnvelope::new(
            aggregate_id,
            "Test",
            0,
            TestEvent::event_type(),
            TestEvent { value },
            Uuid::new_v4(),
            Utc::now(),
        )
    }

    #[test]
    fn test_append_assigns_sequence_numbers() {
        let log: InMemoryEventLog<TestEvent> = InMemoryEventLog::new("Test");
        let aggregate_id = Uuid::new_v4();

        let version = log
            .append_events(aggregate_id, 0, vec![envelope(aggregate_id, 1), envelope(aggregate_id, 2)])
            .unwrap();
        assert_eq!(version, 2);

        let version = log.append_events(aggregate_id, 2, vec![envelope(aggregate_id, 3)]).unwrap();
        assert_eq!(version, 3);

        let events = log.load_events(aggregate_id).unwrap();
        let sequence: Vec<i64> = events.iter().map(|e| e.sequence_number).collect();
        assert_eq!(sequence, vec![1, 2, 3]);
        assert_eq!(events[2].event_data, TestEvent { value: 3 });
    }

    #[test]
    fn test_concurrency_conflict_rejected() {
        let log: InMemoryEventLog<TestEvent> = InMemoryEventLog::new("Test");
        let aggregate_id = Uuid::new_v4();
        log.append_events(aggregate_id, 0, vec![envelope(aggregate_id, 1)]).unwrap();

        let err = log
            .append_events(aggregate_id, 0, vec![envelope(aggregate_id, 2)])
            .unwrap_err();

        assert!(err.to_string().contains("Concurrency conflict"));
        assert_eq!(log.current_version(aggregate_id).unwrap(), 1);
        assert_eq!(log.len().unwrap(), 1);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let log: InMemoryEventLog<TestEvent> = InMemoryEventLog::new("Test");

        let result = log.append_events(Uuid::new_v4(), 0, vec![]);
        assert!(result.is_err());
        assert!(log.is_empty().unwrap());
    }

    #[test]
    fn test_foreign_event_rejected() {
        let log: InMemoryEventLog<TestEvent> = InMemoryEventLog::new("Test");
        let aggregate_id = Uuid::new_v4();

        let result = log.append_events(aggregate_id, 0, vec![envelope(Uuid::new_v4(), 1)]);
        assert!(result.is_err());
        assert_eq!(log.current_version(aggregate_id).unwrap(), 0);
    }

    #[test]
    fn test_streams_are_independent() {
        let log: InMemoryEventLog<TestEvent> = InMemoryEventLog::new("Test");
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        log.append_events(first, 0, vec![envelope(first, 1)]).unwrap();
        log.append_events(second, 0, vec![envelope(second, 2)]).unwrap();
        log.append_events(first, 1, vec![envelope(first, 3)]).unwrap();

        assert_eq!(log.current_version(first).unwrap(), 2);
        assert_eq!(log.current_version(second).unwrap(), 1);
        assert_eq!(log.load_events(second).unwrap().len(), 1);

        let order: Vec<i32> = log.all_events().unwrap().iter().map(|e| e.event_data.value).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let log: Arc<InMemoryEventLog<TestEvent>> = Arc::new(InMemoryEventLog::new("Test"));
        let aggregate_id = Uuid::new_v4();
        log.append_events(aggregate_id, 0, vec![envelope(aggregate_id, 1)]).unwrap();

        let poisoner = log.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("poison the event log");
        })
        .join();

        assert!(log.len().is_err());
        assert!(log.is_empty().is_err());
        assert!(log.current_version(aggregate_id).is_err());
    }
}
