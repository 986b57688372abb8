use serde::{Deserialize, Serialize};

use super::state::OrderOperation;
use super::value_objects::{OrderDetails, OrderLine, OrderLineIdentifier};

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

/// A single add, change or remove against one order line.
///
/// Value equality makes repeated submissions of the same amendment
/// indistinguishable in the order's amendment history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmendOrderLineCommand {
    Add {
        order_line: OrderLine,
    },
    Change {
        identifier: OrderLineIdentifier,
        order_line: OrderLine,
    },
    Remove {
        identifier: OrderLineIdentifier,
    },
}

impl AmendOrderLineCommand {
    pub fn add(order_line: OrderLine) -> Self {
        Self::Add { order_line }
    }

    pub fn change(identifier: OrderLineIdentifier, order_line: OrderLine) -> Self {
        Self::Change { identifier, order_line }
    }

    pub fn remove(identifier: OrderLineIdentifier) -> Self {
        Self::Remove { identifier }
    }

    pub fn is_adding(&self) -> bool {
        matches!(self, Self::Add { .. })
    }

    pub fn is_changing(&self) -> bool {
        matches!(self, Self::Change { .. })
    }

    pub fn is_removing(&self) -> bool {
        matches!(self, Self::Remove { .. })
    }

    /// Target line; an add has none
    pub fn identifier(&self) -> Option<OrderLineIdentifier> {
        match self {
            Self::Add { .. } => None,
            Self::Change { identifier, .. } | Self::Remove { identifier } => Some(*identifier),
        }
    }

    pub fn new_order_line(&self) -> Option<&OrderLine> {
        match self {
            Self::Add { order_line } | Self::Change { order_line, .. } => Some(order_line),
            Self::Remove { .. } => None,
        }
    }
}

/// One variant per public order operation, consumed by the command handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCommand {
    Open,
    Close,
    Suspend { reason: String },
    Resume,
    Cancel { reason: String },
    Update { details: OrderDetails },
    AmendOrderLine { command: AmendOrderLineCommand },
}

impl OrderCommand {
    pub fn operation(&self) -> OrderOperation {
        match self {
            OrderCommand::Open => OrderOperation::Open,
            OrderCommand::Close => OrderOperation::Close,
            OrderCommand::Suspend { .. } => OrderOperation::Suspend,
            OrderCommand::Resume => OrderOperation::Resume,
            OrderCommand::Cancel { .. } => OrderOperation::Cancel,
            OrderCommand::Update { .. } => OrderOperation::Update,
            OrderCommand::AmendOrderLine { .. } => OrderOperation::AmendOrderLine,
        }
    }
}
