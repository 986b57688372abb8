// ============================================================================
// Event Sourcing Infrastructure
// ============================================================================
//
// Generic, reusable envelope and sink abstractions.
// Domain-specific code is in src/domain/
//
// ============================================================================

pub mod core;
pub mod store;

pub use self::core::*;
pub use self::store::*;
