use std::fmt;

use serde::{Deserialize, Serialize};

use super::aggregate::Order;
use super::commands::AmendOrderLineCommand;
use super::errors::OrderError;
use super::value_objects::OrderDetails;

// ============================================================================
// Order Status - Transition Policy
// ============================================================================
//
// Each status is a stateless policy. A public operation on `Order` asks the
// current status whether it is legal; only an accepting status calls the
// matching `do_*` mutator on the order.
//
//   NEW --open--> OPENED --suspend--> SUSPENDED --resume--> OPENED
//   NEW --update--> NEW
//   OPENED --amend order line--> OPENED
//   OPENED | SUSPENDED --close--> CLOSED
//   OPENED | SUSPENDED --cancel--> CANCELLED
//
// CLOSED and CANCELLED are terminal.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Opened,
    Suspended,
    Closed,
    Cancelled,
}

/// Every mutating operation an order exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOperation {
    Open,
    Close,
    Suspend,
    Resume,
    Cancel,
    Update,
    AmendOrderLine,
}

impl OrderOperation {
    pub const ALL: [OrderOperation; 7] = [
        OrderOperation::Open,
        OrderOperation::Close,
        OrderOperation::Suspend,
        OrderOperation::Resume,
        OrderOperation::Cancel,
        OrderOperation::Update,
        OrderOperation::AmendOrderLine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderOperation::Open => "open",
            OrderOperation::Close => "close",
            OrderOperation::Suspend => "suspend",
            OrderOperation::Resume => "resume",
            OrderOperation::Cancel => "cancel",
            OrderOperation::Update => "update",
            OrderOperation::AmendOrderLine => "amend order line",
        }
    }
}

impl fmt::Display for OrderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::Opened,
        OrderStatus::Suspended,
        OrderStatus::Closed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Opened => "OPENED",
            OrderStatus::Suspended => "SUSPENDED",
            OrderStatus::Closed => "CLOSED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// The transition table: whether `operation` is legal from this status
    pub fn permits(&self, operation: OrderOperation) -> bool {
        use OrderOperation::*;
        use OrderStatus::*;

        matches!(
            (self, operation),
            (New, Open)
                | (New, Update)
                | (Opened, Close)
                | (Opened, Suspend)
                | (Opened, Cancel)
                | (Opened, AmendOrderLine)
                | (Suspended, Close)
                | (Suspended, Resume)
                | (Suspended, Cancel)
        )
    }

    pub fn allowed_operations(&self) -> Vec<OrderOperation> {
        OrderOperation::ALL
            .into_iter()
            .filter(|operation| self.permits(*operation))
            .collect()
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_operations().is_empty()
    }

    pub fn can_update(&self) -> bool {
        self.permits(OrderOperation::Update)
    }

    pub fn can_amend_order_line(&self) -> bool {
        self.permits(OrderOperation::AmendOrderLine)
    }

    /// Only the order's own status may act on it
    fn guard(self, order: &Order, operation: OrderOperation) -> Result<(), OrderError> {
        let status = order.status();
        if self == status && self.permits(operation) {
            Ok(())
        } else {
            Err(OrderError::IllegalState { operation, status })
        }
    }

    // ========================================================================
    // Guarded operations
    // ========================================================================

    pub(super) fn open(self, order: &mut Order) -> Result<(), OrderError> {
        self.guard(order, OrderOperation::Open)?;
        order.do_open();
        Ok(())
    }

    pub(super) fn close(self, order: &mut Order) -> Result<(), OrderError> {
        self.guard(order, OrderOperation::Close)?;
        order.do_close();
        Ok(())
    }

    pub(super) fn suspend(self, order: &mut Order, reason: String) -> Result<(), OrderError> {
        self.guard(order, OrderOperation::Suspend)?;
        order.do_suspend(reason);
        Ok(())
    }

    pub(super) fn resume(self, order: &mut Order) -> Result<(), OrderError> {
        self.guard(order, OrderOperation::Resume)?;
        order.do_resume();
        Ok(())
    }

    pub(super) fn cancel(self, order: &mut Order, reason: String) -> Result<(), OrderError> {
        self.guard(order, OrderOperation::Cancel)?;
        order.do_cancel(reason);
        Ok(())
    }

    pub(super) fn update(self, order: &mut Order, details: OrderDetails) -> Result<(), OrderError> {
        self.guard(order, OrderOperation::Update)?;
        order.do_update(details);
        Ok(())
    }

    pub(super) fn amend_order_line(
        self,
        order: &mut Order,
        command: AmendOrderLineCommand,
    ) -> Result<(), OrderError> {
        self.guard(order, OrderOperation::AmendOrderLine)?;
        order.do_amend_order_line(command)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::value_objects::{OrderIdentifier, OrderLine};
    use uuid::Uuid;

    fn order_in(status: OrderStatus) -> Order {
        Order::builder()
            .with_status(status)
            .with_identifier(OrderIdentifier::new())
            .with_details(OrderDetails::default())
            .build()
            .unwrap()
    }

    fn legal_origins(operation: OrderOperation) -> Vec<OrderStatus> {
        match operation {
            OrderOperation::Open => vec![OrderStatus::New],
            OrderOperation::Close => vec![OrderStatus::Opened, OrderStatus::Suspended],
            OrderOperation::Suspend => vec![OrderStatus::Opened],
            OrderOperation::Resume => vec![OrderStatus::Suspended],
            OrderOperation::Cancel => vec![OrderStatus::Opened, OrderStatus::Suspended],
            OrderOperation::Update => vec![OrderStatus::New],
            OrderOperation::AmendOrderLine => vec![OrderStatus::Opened],
        }
    }

    fn complement(statuses: &[OrderStatus]) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|status| !statuses.contains(status))
            .collect()
    }

    fn apply(status: OrderStatus, operation: OrderOperation, order: &mut Order) -> Result<(), OrderError> {
        match operation {
            OrderOperation::Open => status.open(order),
            OrderOperation::Close => status.close(order),
            OrderOperation::Suspend => status.suspend(order, String::new()),
            OrderOperation::Resume => status.resume(order),
            OrderOperation::Cancel => status.cancel(order, String::new()),
            OrderOperation::Update => status.update(order, OrderDetails::default()),
            OrderOperation::AmendOrderLine => status.amend_order_line(
                order,
                AmendOrderLineCommand::add(OrderLine::new(Uuid::new_v4(), 1)),
            ),
        }
    }

    fn expected_target(status: OrderStatus, operation: OrderOperation) -> OrderStatus {
        match operation {
            OrderOperation::Open | OrderOperation::Resume => OrderStatus::Opened,
            OrderOperation::Close => OrderStatus::Closed,
            OrderOperation::Suspend => OrderStatus::Suspended,
            OrderOperation::Cancel => OrderStatus::Cancelled,
            OrderOperation::Update | OrderOperation::AmendOrderLine => status,
        }
    }

    #[test]
    fn test_permitted_operations_reach_documented_target() {
        for operation in OrderOperation::ALL {
            for status in legal_origins(operation) {
                let mut order = order_in(status);

                apply(status, operation, &mut order).unwrap();

                assert_eq!(
                    order.status(),
                    expected_target(status, operation),
                    "{operation} from {status}"
                );
            }
        }
    }

    #[test]
    fn test_illegal_operations_fail_and_leave_order_untouched() {
        for operation in OrderOperation::ALL {
            for status in complement(&legal_origins(operation)) {
                let mut order = order_in(status);
                let before = order.clone();

                let err = apply(status, operation, &mut order).unwrap_err();

                assert_eq!(err, OrderError::IllegalState { operation, status });
                let message = err.to_string();
                assert!(
                    message.contains(&format!(" {} ", operation.as_str())),
                    "message {message:?} should name {operation}"
                );
                assert_eq!(order, before);
            }
        }
    }

    #[test]
    fn test_status_cannot_act_on_order_in_another_status() {
        for operation in OrderOperation::ALL {
            for acting in legal_origins(operation) {
                for actual in OrderStatus::ALL.into_iter().filter(|status| *status != acting) {
                    let mut order = order_in(actual);
                    let before = order.clone();

                    let err = apply(acting, operation, &mut order).unwrap_err();

                    assert_eq!(err, OrderError::IllegalState { operation, status: actual });
                    assert_eq!(order, before);
                }
            }
        }

        let mut order = order_in(OrderStatus::New);
        assert!(OrderStatus::Opened.close(&mut order).is_err());
        assert_eq!(order.status(), OrderStatus::New);
    }

    #[test]
    fn test_transition_table_matches_permits() {
        for operation in OrderOperation::ALL {
            let origins = legal_origins(operation);
            for status in OrderStatus::ALL {
                assert_eq!(status.permits(operation), origins.contains(&status));
            }
        }
    }

    #[test]
    fn test_can_update_only_when_new() {
        for status in OrderStatus::ALL {
            assert_eq!(status.can_update(), status == OrderStatus::New);
        }
    }

    #[test]
    fn test_can_amend_order_line_only_when_opened() {
        for status in OrderStatus::ALL {
            assert_eq!(status.can_amend_order_line(), status == OrderStatus::Opened);
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Closed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::Opened.is_terminal());
        assert!(!OrderStatus::Suspended.is_terminal());
    }

    #[test]
    fn test_allowed_operations_from_suspended() {
        assert_eq!(
            OrderStatus::Suspended.allowed_operations(),
            vec![OrderOperation::Close, OrderOperation::Resume, OrderOperation::Cancel]
        );
    }

    #[test]
    fn test_order_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::Suspended).unwrap();
        assert_eq!(json, "\"SUSPENDED\"");

        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}
