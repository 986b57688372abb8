// ============================================================================
// Order Domain - Lifecycle State Machine
// ============================================================================
//
// - Value objects (OrderIdentifier, OrderLine, OrderDetails)
// - State (OrderStatus transition policy, OrderOperation)
// - Commands (AmendOrderLineCommand, OrderCommand)
// - Events (OrderOpened, OrderSuspended, etc.)
// - Errors (OrderError enum)
// - Aggregate (Order context and its builder)
// - Command Handler (OrderCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod state;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use state::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;
