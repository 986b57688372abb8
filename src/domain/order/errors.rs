use super::state::{OrderOperation, OrderStatus};
use super::value_objects::OrderLineIdentifier;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// The current status does not permit the attempted operation
    #[error("cannot {operation} while order is {status}")]
    IllegalState {
        operation: OrderOperation,
        status: OrderStatus,
    },

    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("order line not found: {0}")]
    OrderLineNotFound(OrderLineIdentifier),

    #[error("order line already exists: {0}")]
    DuplicateOrderLine(OrderLineIdentifier),
}

impl OrderError {
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, OrderError::IllegalState { .. })
    }
}
