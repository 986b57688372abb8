use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Identity of an order, fixed once the order is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderIdentifier(pub Uuid);

impl OrderIdentifier {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a single line within an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLineIdentifier(pub Uuid);

impl OrderLineIdentifier {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderLineIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderLineIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    pub identifier: OrderLineIdentifier,
    pub product_id: Uuid,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(product_id: Uuid, quantity: u32) -> Self {
        Self {
            identifier: OrderLineIdentifier::new(),
            product_id,
            quantity,
        }
    }

    pub fn with_identifier(mut self, identifier: OrderLineIdentifier) -> Self {
        self.identifier = identifier;
        self
    }
}

// ============================================================================
// Order Details - the mutable contents of an order
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    order_lines: Vec<OrderLine>,
}

impl OrderDetails {
    pub fn new(order_lines: Vec<OrderLine>) -> Self {
        Self { order_lines }
    }

    pub fn order_lines(&self) -> &[OrderLine] {
        &self.order_lines
    }

    pub fn order_line(&self, identifier: OrderLineIdentifier) -> Option<&OrderLine> {
        self.order_lines.iter().find(|line| line.identifier == identifier)
    }

    pub fn contains(&self, identifier: OrderLineIdentifier) -> bool {
        self.order_line(identifier).is_some()
    }

    pub fn add_order_line(&mut self, order_line: OrderLine) -> Result<(), OrderError> {
        if self.contains(order_line.identifier) {
            return Err(OrderError::DuplicateOrderLine(order_line.identifier));
        }

        self.order_lines.push(order_line);
        Ok(())
    }

    /// Replace the content of an existing line, keeping its identity and position
    pub fn change_order_line(
        &mut self,
        identifier: OrderLineIdentifier,
        order_line: OrderLine,
    ) -> Result<(), OrderError> {
        let slot = self
            .order_lines
            .iter_mut()
            .find(|line| line.identifier == identifier)
            .ok_or(OrderError::OrderLineNotFound(identifier))?;

        *slot = order_line.with_identifier(identifier);
        Ok(())
    }

    pub fn remove_order_line(&mut self, identifier: OrderLineIdentifier) -> Result<(), OrderError> {
        let position = self
            .order_lines
            .iter()
            .position(|line| line.identifier == identifier)
            .ok_or(OrderError::OrderLineNotFound(identifier))?;

        self.order_lines.remove(position);
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
