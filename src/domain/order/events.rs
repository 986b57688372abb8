use serde::{Deserialize, Serialize};

use crate::event_sourcing::core::DomainEvent;
use super::commands::AmendOrderLineCommand;
use super::state::OrderStatus;
use super::value_objects::OrderDetails;

// ============================================================================
// Order Events - Lifecycle events, one per accepted transition
// ============================================================================
//
// Identifier, actor and timestamp travel on the `EventEnvelope`; payloads
// carry the status pair and whatever the operation supplied.
//
// ============================================================================

/// Order Event - Union type for all order events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    Opened(OrderOpened),
    Closed(OrderClosed),
    Suspended(OrderSuspended),
    Resumed(OrderResumed),
    Cancelled(OrderCancelled),
    DetailsUpdated(OrderDetailsUpdated),
    OrderLineAmended(OrderLineAmended),
}

impl OrderEvent {
    pub fn event_type_name(&self) -> &'static str {
        match self {
            OrderEvent::Opened(_) => OrderOpened::event_type(),
            OrderEvent::Closed(_) => OrderClosed::event_type(),
            OrderEvent::Suspended(_) => OrderSuspended::event_type(),
            OrderEvent::Resumed(_) => OrderResumed::event_type(),
            OrderEvent::Cancelled(_) => OrderCancelled::event_type(),
            OrderEvent::DetailsUpdated(_) => OrderDetailsUpdated::event_type(),
            OrderEvent::OrderLineAmended(_) => OrderLineAmended::event_type(),
        }
    }

    pub fn status_change(&self) -> StatusChange {
        match self {
            OrderEvent::Opened(e) => e.change,
            OrderEvent::Closed(e) => e.change,
            OrderEvent::Suspended(e) => e.change,
            OrderEvent::Resumed(e) => e.change,
            OrderEvent::Cancelled(e) => e.change,
            OrderEvent::DetailsUpdated(e) => e.change,
            OrderEvent::OrderLineAmended(e) => e.change,
        }
    }
}

impl DomainEvent for OrderEvent {
    fn event_type() -> &'static str { "OrderEvent" }
}

/// Status before and after the transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
}

impl StatusChange {
    pub fn new(old_status: OrderStatus, new_status: OrderStatus) -> Self {
        Self { old_status, new_status }
    }

    pub fn is_self_loop(&self) -> bool {
        self.old_status == self.new_status
    }
}

// ============================================================================
// Individual Event Types
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderOpened {
    #[serde(flatten)]
    pub change: StatusChange,
}

impl DomainEvent for OrderOpened {
    fn event_type() -> &'static str { "OrderOpened" }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderClosed {
    #[serde(flatten)]
    pub change: StatusChange,
}

impl DomainEvent for OrderClosed {
    fn event_type() -> &'static str { "OrderClosed" }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderSuspended {
    #[serde(flatten)]
    pub change: StatusChange,
    pub reason: String,
}

impl DomainEvent for OrderSuspended {
    fn event_type() -> &'static str { "OrderSuspended" }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderResumed {
    #[serde(flatten)]
    pub change: StatusChange,
}

impl DomainEvent for OrderResumed {
    fn event_type() -> &'static str { "OrderResumed" }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderCancelled {
    #[serde(flatten)]
    pub change: StatusChange,
    pub reason: String,
}

impl DomainEvent for OrderCancelled {
    fn event_type() -> &'static str { "OrderCancelled" }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderDetailsUpdated {
    #[serde(flatten)]
    pub change: StatusChange,
    pub details: OrderDetails,
}

impl DomainEvent for OrderDetailsUpdated {
    fn event_type() -> &'static str { "OrderDetailsUpdated" }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderLineAmended {
    #[serde(flatten)]
    pub change: StatusChange,
    pub command: AmendOrderLineCommand,
}

impl DomainEvent for OrderLineAmended {
    fn event_type() -> &'static str { "OrderLineAmended" }
}
