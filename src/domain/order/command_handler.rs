use std::sync::Arc;
use uuid::Uuid;
use anyhow::Result;

use crate::event_sourcing::core::EventEnvelope;
use crate::event_sourcing::store::EventSink;
use crate::metrics::TransitionMetrics;
use crate::provenance::{Clock, CurrentUserProvider};

use super::aggregate::Order;
use super::commands::OrderCommand;
use super::errors::OrderError;
use super::events::*;
use super::state::{OrderOperation, OrderStatus};

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Orchestrates: Command → Order (guarded) → Event → Event Sink
//
// Nothing is emitted for a rejected command. The handler holds no order
// state; `&mut Order` keeps mutations on one order serialized.
//
// ============================================================================

pub const ORDER_AGGREGATE_TYPE: &str = "Order";

const SINK_FAILURE_LABEL: &str = "event_sink";

pub struct OrderCommandHandler<S: EventSink<OrderEvent>> {
    event_sink: Arc<S>,
    clock: Arc<dyn Clock>,
    user_provider: Arc<dyn CurrentUserProvider>,
    metrics: Option<Arc<TransitionMetrics>>,
    aggregate_type: String,
}

impl<S: EventSink<OrderEvent>> OrderCommandHandler<S> {
    pub fn new(
        event_sink: Arc<S>,
        clock: Arc<dyn Clock>,
        user_provider: Arc<dyn CurrentUserProvider>,
    ) -> Self {
        Self {
            event_sink,
            clock,
            user_provider,
            metrics: None,
            aggregate_type: ORDER_AGGREGATE_TYPE.to_string(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<TransitionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_aggregate_type(mut self, aggregate_type: impl Into<String>) -> Self {
        self.aggregate_type = aggregate_type.into();
        self
    }

    /// Apply a command to the order and hand the resulting event to the sink.
    ///
    /// Returns the new stream version. A rejected command surfaces as an
    /// `OrderError` inside the `anyhow::Error`. The order is left untouched
    /// unless the event was appended.
    pub fn handle(&self, order: &mut Order, command: OrderCommand, correlation_id: Uuid) -> Result<i64> {
        let operation = command.operation();
        let old_status = order.status();

        let mut candidate = order.clone();
        let domain_event = match Self::apply(&mut candidate, command) {
            Ok(build_event) => build_event(StatusChange::new(old_status, candidate.status())),
            Err(err) => {
                tracing::warn!(
                    order_id = %order.identifier(),
                    %operation,
                    status = %old_status,
                    error = %err,
                    "Order command rejected"
                );
                self.record_rejected(operation, old_status, rejection_label(&err));
                return Err(err.into());
            }
        };

        let new_status = candidate.status();
        let event_type = domain_event.event_type_name();

        let new_version = match self.hand_off(&candidate, domain_event, correlation_id) {
            Ok(version) => version,
            Err(err) => {
                tracing::error!(
                    order_id = %order.identifier(),
                    %operation,
                    status = %old_status,
                    error = %err,
                    "Event hand-off failed, order left unchanged"
                );
                self.record_rejected(operation, old_status, SINK_FAILURE_LABEL);
                return Err(err);
            }
        };

        *order = candidate;

        tracing::info!(
            order_id = %order.identifier(),
            %operation,
            from = %old_status,
            to = %new_status,
            event_type,
            version = new_version,
            "Order command accepted"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_accepted(operation, old_status, new_status);
        }

        Ok(new_version)
    }

    fn hand_off(&self, order: &Order, domain_event: OrderEvent, correlation_id: Uuid) -> Result<i64> {
        let aggregate_id = order.identifier().as_uuid();
        let expected_version = self.event_sink.current_version(aggregate_id)?;
        let event_type = domain_event.event_type_name();

        let envelope = EventEnvelope::new(
            aggregate_id,
            self.aggregate_type.as_str(),
            expected_version + 1,
            event_type,
            domain_event,
            correlation_id,
            self.clock.now(),
        )
        .with_user(self.user_provider.current_user());

        self.event_sink
            .append_events(aggregate_id, expected_version, vec![envelope])
    }

    fn record_rejected(&self, operation: OrderOperation, status: OrderStatus, reason: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_rejected(operation, status, reason);
        }
    }

    /// Run the guarded operation; on success return a constructor for the event
    fn apply(
        order: &mut Order,
        command: OrderCommand,
    ) -> Result<Box<dyn FnOnce(StatusChange) -> OrderEvent>, OrderError> {
        Ok(match command {
            OrderCommand::Open => {
                order.open()?;
                Box::new(|change| OrderEvent::Opened(OrderOpened { change }))
            }
            OrderCommand::Close => {
                order.close()?;
                Box::new(|change| OrderEvent::Closed(OrderClosed { change }))
            }
            OrderCommand::Suspend { reason } => {
                order.suspend(reason.clone())?;
                Box::new(move |change| OrderEvent::Suspended(OrderSuspended { change, reason }))
            }
            OrderCommand::Resume => {
                order.resume()?;
                Box::new(|change| OrderEvent::Resumed(OrderResumed { change }))
            }
            OrderCommand::Cancel { reason } => {
                order.cancel(reason.clone())?;
                Box::new(move |change| OrderEvent::Cancelled(OrderCancelled { change, reason }))
            }
            OrderCommand::Update { details } => {
                order.update(details.clone())?;
                Box::new(move |change| OrderEvent::DetailsUpdated(OrderDetailsUpdated { change, details }))
            }
            OrderCommand::AmendOrderLine { command } => {
                order.amend_order_line(command.clone())?;
                Box::new(move |change| OrderEvent::OrderLineAmended(OrderLineAmended { change, command }))
            }
        })
    }
}

fn rejection_label(err: &OrderError) -> &'static str {
    match err {
        OrderError::IllegalState { .. } => "illegal_state",
        OrderError::MissingArgument(_) => "missing_argument",
        OrderError::OrderLineNotFound(_) => "order_line_not_found",
        OrderError::DuplicateOrderLine(_) => "duplicate_order_line",
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
