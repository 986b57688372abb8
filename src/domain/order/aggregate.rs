use serde::Serialize;

use super::commands::AmendOrderLineCommand;
use super::errors::OrderError;
use super::state::OrderStatus;
use super::value_objects::{OrderDetails, OrderIdentifier};

// ============================================================================
// Order - State Machine Context
// ============================================================================
//
// Public operations never mutate directly: they hand the order to its current
// status, which either rejects the call or invokes the matching `do_*`
// mutator. The mutators are visible to the `domain::order` module only.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    status: OrderStatus,
    identifier: OrderIdentifier,
    details: OrderDetails,
    order_line_amendments: Vec<AmendOrderLineCommand>,
    suspended_reason: Option<String>,
    cancelled_reason: Option<String>,
}

impl Order {
    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn identifier(&self) -> OrderIdentifier {
        self.identifier
    }

    pub fn details(&self) -> &OrderDetails {
        &self.details
    }

    /// Applied amendments, each recorded once, in the order first applied
    pub fn order_line_amendments(&self) -> &[AmendOrderLineCommand] {
        &self.order_line_amendments
    }

    /// Why the order is currently suspended
    pub fn suspended_reason(&self) -> Option<&str> {
        self.suspended_reason.as_deref()
    }

    pub fn cancelled_reason(&self) -> Option<&str> {
        self.cancelled_reason.as_deref()
    }

    pub fn can_update(&self) -> bool {
        self.status.can_update()
    }

    pub fn can_amend_order_line(&self) -> bool {
        self.status.can_amend_order_line()
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    pub fn open(&mut self) -> Result<(), OrderError> {
        self.status.open(self)
    }

    pub fn close(&mut self) -> Result<(), OrderError> {
        self.status.close(self)
    }

    pub fn suspend(&mut self, reason: impl Into<String>) -> Result<(), OrderError> {
        self.status.suspend(self, reason.into())
    }

    pub fn resume(&mut self) -> Result<(), OrderError> {
        self.status.resume(self)
    }

    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<(), OrderError> {
        self.status.cancel(self, reason.into())
    }

    pub fn update(&mut self, details: OrderDetails) -> Result<(), OrderError> {
        self.status.update(self, details)
    }

    pub fn amend_order_line(&mut self, command: AmendOrderLineCommand) -> Result<(), OrderError> {
        self.status.amend_order_line(self, command)
    }

    // ========================================================================
    // Mutators - reachable only through the status guard
    // ========================================================================

    pub(super) fn do_open(&mut self) {
        self.status = OrderStatus::Opened;
    }

    pub(super) fn do_close(&mut self) {
        self.status = OrderStatus::Closed;
    }

    pub(super) fn do_suspend(&mut self, reason: String) {
        self.status = OrderStatus::Suspended;
        self.suspended_reason = Some(reason);
    }

    pub(super) fn do_resume(&mut self) {
        self.status = OrderStatus::Opened;
        self.suspended_reason = None;
    }

    pub(super) fn do_cancel(&mut self, reason: String) {
        self.status = OrderStatus::Cancelled;
        self.cancelled_reason = Some(reason);
    }

    pub(super) fn do_update(&mut self, details: OrderDetails) {
        self.details = details;
    }

    pub(super) fn do_amend_order_line(&mut self, command: AmendOrderLineCommand) -> Result<(), OrderError> {
        match &command {
            AmendOrderLineCommand::Change { identifier, order_line } => {
                self.details.change_order_line(*identifier, order_line.clone())?;
            }
            AmendOrderLineCommand::Add { order_line } => {
                self.details.add_order_line(order_line.clone())?;
            }
            AmendOrderLineCommand::Remove { identifier } => {
                self.details.remove_order_line(*identifier)?;
            }
        }

        if !self.order_line_amendments.contains(&command) {
            self.order_line_amendments.push(command);
        }

        Ok(())
    }
}

// ============================================================================
// Order Builder
// ============================================================================

#[derive(Debug, Default)]
pub struct OrderBuilder {
    status: Option<OrderStatus>,
    identifier: Option<OrderIdentifier>,
    details: Option<OrderDetails>,
}

impl OrderBuilder {
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn new_order(self) -> Self {
        self.with_status(OrderStatus::New)
    }

    pub fn opened_order(self) -> Self {
        self.with_status(OrderStatus::Opened)
    }

    pub fn with_identifier(mut self, identifier: OrderIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_details(mut self, details: OrderDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn build(self) -> Result<Order, OrderError> {
        Ok(Order {
            status: self.status.ok_or(OrderError::MissingArgument("status"))?,
            identifier: self.identifier.ok_or(OrderError::MissingArgument("identifier"))?,
            details: self.details.ok_or(OrderError::MissingArgument("details"))?,
            order_line_amendments: Vec::new(),
            suspended_reason: None,
            cancelled_reason: None,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
